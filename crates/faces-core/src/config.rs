/// Process-wide knobs shared by the tree and the search expression layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FacesConfig {
    separator_char: char,
    expression_separators: String,
    keyword_prefix: char,
    id_prefix: String,
    behavior_source_param: String,
}

impl FacesConfig {
    pub const DEFAULT_SEPARATOR_CHAR: char = ':';
    pub const DEFAULT_EXPRESSION_SEPARATORS: &'static str = " ,";
    pub const DEFAULT_KEYWORD_PREFIX: char = '@';
    pub const DEFAULT_ID_PREFIX: &'static str = "j_id";
    pub const DEFAULT_BEHAVIOR_SOURCE_PARAM: &'static str = "jakarta.faces.source";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn separator_char(&self) -> char {
        self.separator_char
    }

    pub fn expression_separators(&self) -> &str {
        &self.expression_separators
    }

    pub fn keyword_prefix(&self) -> char {
        self.keyword_prefix
    }

    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    /// Request parameter naming the client id that triggered an ajax behavior.
    pub fn behavior_source_param(&self) -> &str {
        &self.behavior_source_param
    }

    pub fn with_separator_char(mut self, separator: char) -> Self {
        self.separator_char = separator;
        self
    }

    pub fn with_expression_separators(mut self, separators: impl Into<String>) -> Self {
        self.expression_separators = separators.into();
        self
    }

    pub fn with_keyword_prefix(mut self, prefix: char) -> Self {
        self.keyword_prefix = prefix;
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_behavior_source_param(mut self, name: impl Into<String>) -> Self {
        self.behavior_source_param = name.into();
        self
    }

    pub fn is_expression_separator(&self, c: char) -> bool {
        self.expression_separators.contains(c)
    }
}

impl Default for FacesConfig {
    fn default() -> Self {
        Self {
            separator_char: Self::DEFAULT_SEPARATOR_CHAR,
            expression_separators: Self::DEFAULT_EXPRESSION_SEPARATORS.to_string(),
            keyword_prefix: Self::DEFAULT_KEYWORD_PREFIX,
            id_prefix: Self::DEFAULT_ID_PREFIX.to_string(),
            behavior_source_param: Self::DEFAULT_BEHAVIOR_SOURCE_PARAM.to_string(),
        }
    }
}
