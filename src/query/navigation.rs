use crate::lambda::Lambda;

/// One navigation property of an include chain, with the optional join
/// condition and element filter attached by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationStep {
    pub property: String,
    pub condition: Option<Lambda>,
    pub filter: Option<Lambda>,
}

impl NavigationStep {
    pub fn new(property: &str) -> Self {
        Self { property: property.to_string(), condition: None, filter: None }
    }

    pub fn with_condition(mut self, condition: Lambda) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_filter(mut self, filter: Lambda) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Path of navigation properties walked by an include, outermost first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NavigationChain {
    pub steps: Vec<NavigationStep>,
}

impl NavigationChain {
    pub fn new(steps: Vec<NavigationStep>) -> Self {
        Self { steps }
    }

    pub fn then(mut self, step: NavigationStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Dotted rendering, for logs and error messages.
    pub fn path(&self) -> String {
        self.steps.iter().map(|s| s.property.as_str()).collect::<Vec<_>>().join(".")
    }
}

impl From<&str> for NavigationChain {
    fn from(value: &str) -> Self {
        let steps = value
            .split('.')
            .filter(|part| !part.is_empty())
            .map(NavigationStep::new)
            .collect();
        Self { steps }
    }
}

impl From<&str> for NavigationStep {
    fn from(property: &str) -> Self {
        NavigationStep::new(property)
    }
}

impl From<NavigationStep> for NavigationChain {
    fn from(step: NavigationStep) -> Self {
        Self { steps: vec![step] }
    }
}
