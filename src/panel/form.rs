//! The config form: string-valued fields keyed by their submission names.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Fields of the config form, named as they are submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Email,
    Password,
    /// Multi-line, one URL per line.
    GroupUrls,
    PageUrl,
    PostContent,
    /// Seconds.
    BetweenGroupsMin,
    /// Seconds.
    BetweenGroupsMax,
    /// Minutes.
    LoopRestMin,
    /// Minutes.
    LoopRestMax,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Email,
        FormField::Password,
        FormField::GroupUrls,
        FormField::PageUrl,
        FormField::PostContent,
        FormField::BetweenGroupsMin,
        FormField::BetweenGroupsMax,
        FormField::LoopRestMin,
        FormField::LoopRestMax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::GroupUrls => "group_urls",
            Self::PageUrl => "page_url",
            Self::PostContent => "post_content",
            Self::BetweenGroupsMin => "between_groups_min",
            Self::BetweenGroupsMax => "between_groups_max",
            Self::LoopRestMin => "loop_rest_min",
            Self::LoopRestMax => "loop_rest_max",
        }
    }

    /// Human label for rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::GroupUrls => "Group URLs",
            Self::PageUrl => "Page URL",
            Self::PostContent => "Post content",
            Self::BetweenGroupsMin => "Between groups min (s)",
            Self::BetweenGroupsMax => "Between groups max (s)",
            Self::LoopRestMin => "Loop rest min (min)",
            Self::LoopRestMax => "Loop rest max (min)",
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::GroupUrls | Self::PostContent)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Current contents of the config form, exactly as the operator sees them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigForm {
    pub email: String,
    pub password: String,
    pub group_urls: String,
    pub page_url: String,
    pub post_content: String,
    pub between_groups_min: String,
    pub between_groups_max: String,
    pub loop_rest_min: String,
    pub loop_rest_max: String,
    /// Stored seconds behind a loop-rest field that displays as `0` minutes.
    pub loop_rest_min_sub_minute: Option<i64>,
    pub loop_rest_max_sub_minute: Option<i64>,
}

impl ConfigForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::GroupUrls => &self.group_urls,
            FormField::PageUrl => &self.page_url,
            FormField::PostContent => &self.post_content,
            FormField::BetweenGroupsMin => &self.between_groups_min,
            FormField::BetweenGroupsMax => &self.between_groups_max,
            FormField::LoopRestMin => &self.loop_rest_min,
            FormField::LoopRestMax => &self.loop_rest_max,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    /// Append a line to a field, inserting a newline when it is non-empty.
    pub fn append_line(&mut self, field: FormField, line: &str) {
        let slot = self.slot(field);
        if !slot.is_empty() {
            slot.push('\n');
        }
        slot.push_str(line);
    }

    fn slot(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
            FormField::GroupUrls => &mut self.group_urls,
            FormField::PageUrl => &mut self.page_url,
            FormField::PostContent => &mut self.post_content,
            FormField::BetweenGroupsMin => &mut self.between_groups_min,
            FormField::BetweenGroupsMax => &mut self.between_groups_max,
            FormField::LoopRestMin => &mut self.loop_rest_min,
            FormField::LoopRestMax => &mut self.loop_rest_max,
        }
    }
}
