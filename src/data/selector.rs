use super::model::DATASETS;

/// Which datasets to load.
///
/// Names are not checked against [`DATASETS`]; an unknown name fails when the
/// source tries to resolve it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selector {
    /// Every bundled dataset, in canonical order.
    #[default]
    All,
    One(String),
    /// Kept as given: order and duplicates are preserved.
    Many(Vec<String>),
}

impl Selector {
    /// Normalize into the ordered sequence of names to load.
    pub fn names(&self) -> Vec<String> {
        match self {
            Selector::All => DATASETS.iter().map(|s| s.to_string()).collect(),
            Selector::One(name) => vec![name.clone()],
            Selector::Many(names) => names.clone(),
        }
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::One(name.to_string())
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector::One(name)
    }
}

impl From<Vec<String>> for Selector {
    fn from(names: Vec<String>) -> Self {
        Selector::Many(names)
    }
}

impl From<Vec<&str>> for Selector {
    fn from(names: Vec<&str>) -> Self {
        Selector::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Selector {
    fn from(names: &[&str]) -> Self {
        Selector::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Selector {
    fn from(names: [&str; N]) -> Self {
        Selector::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// `None` selects everything.
impl<T: Into<Selector>> From<Option<T>> for Selector {
    fn from(which: Option<T>) -> Self {
        which.map_or(Selector::All, Into::into)
    }
}
