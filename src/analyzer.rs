//! Morphological analysis and the noun filter
//!
//! The analyzer itself is somebody else's program. All we need from it is a list of units, each
//! with the exact text it covers and a comma-separated classification whose first two fields are
//! the part of speech and its sub-category (MeCab style: `名詞,固有名詞,地域,...`).
use errors::*;

/// One token from the analyzer
#[derive(PartialEq,Eq,Debug,Clone)]
pub struct Unit {
    pub surface: String,
    pub feature: String,
}

impl Unit {
    pub fn new<S: Into<String>, F: Into<String>>(surface: S, feature: F) -> Self {
        Unit { surface: surface.into(), feature: feature.into() }
    }

    /// The (category, sub-category) pair at the front of the feature string
    pub fn classification(&self) -> Result<(&str, &str)> {
        let mut fields = self.feature.split(',');
        match (fields.next(), fields.next()) {
            (Some(category), Some(sub_category)) => Ok((category, sub_category)),
            _ => Err(Error::MalformedFeature(self.feature.clone())),
        }
    }
}

/// Anything that can split text into classified units
pub trait Analyzer {
    /// Analyze some text, which may span many lines
    fn analyze(&mut self, text: &str) -> Result<Vec<Unit>>;

    /// Some analyzers misbehave on their first real call, so throw one away first
    fn warm_up(&mut self) -> Result<()> {
        self.analyze("").map(|_| ())
    }
}

impl<'a, A: Analyzer + ?Sized> Analyzer for &'a mut A {
    fn analyze(&mut self, text: &str) -> Result<Vec<Unit>> {
        (**self).analyze(text)
    }
    fn warm_up(&mut self) -> Result<()> {
        (**self).warm_up()
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&mut self, text: &str) -> Result<Vec<Unit>> {
        (**self).analyze(text)
    }
    fn warm_up(&mut self) -> Result<()> {
        (**self).warm_up()
    }
}

/// Which units count as content nouns
///
/// Only entity and content nouns are kept. Numerals, pronouns, suffixes and the like are left
/// out, otherwise particles and punctuation fragments creep into the counts.
#[derive(PartialEq,Eq,Debug,Clone)]
pub struct NounFilter {
    pub category: String,
    pub sub_categories: Vec<String>,
}

impl NounFilter {
    /// IPADIC (MeCab's usual dictionary): proper nouns and common nouns
    pub fn ipadic() -> Self {
        NounFilter {
            category: "名詞".to_string(),
            sub_categories: vec!["固有名詞".to_string(), "一般".to_string()],
        }
    }

    /// UniDIC names common nouns differently
    pub fn unidic() -> Self {
        NounFilter {
            category: "名詞".to_string(),
            sub_categories: vec!["固有名詞".to_string(), "普通名詞".to_string()],
        }
    }

    /// By tag set name, as given on the command line
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "ipadic" => Some(NounFilter::ipadic()),
            "unidic" => Some(NounFilter::unidic()),
            _ => None,
        }
    }

    /// Fails on a classification without a sub-category. That is a broken analyzer, and
    /// guessing would quietly skew the counts.
    pub fn accepts(&self, unit: &Unit) -> Result<bool> {
        let (category, sub_category) = unit.classification()?;
        Ok(category == self.category
            && self.sub_categories.iter().any(|s| s == sub_category))
    }
}

impl Default for NounFilter {
    fn default() -> Self {
        NounFilter::ipadic()
    }
}

/// All the nouns in a document, in the analyzer's order, repeats included
pub fn nouns<A: Analyzer + ?Sized>(analyzer: &mut A, filter: &NounFilter, document: &str)
    -> Result<Vec<String>> {
    let mut terms = vec![];
    for unit in analyzer.analyze(document)? {
        if filter.accepts(&unit)? {
            terms.push(unit.surface);
        }
    }
    Ok(terms)
}
