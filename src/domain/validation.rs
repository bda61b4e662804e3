use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::domain::backend::InfrastructureBackend;
use crate::domain::operation::{Field, FieldValue, OperationRequest};
use crate::error::ConversionError;

lazy_static! {
    static ref VERSION_PATTERN: Regex = Regex::new(r"^\d\.\d").expect("version pattern is a valid regex");
}

/// Largest node count accepted for a single role unless configured otherwise.
pub const DEFAULT_MAX_NODES_PER_ROLE: i64 = 100;

/// How the supported-version set is applied to a requested version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionPolicy {
    /// The version must be a member of the supported set.
    #[default]
    RequireSupported,
    /// The version must not be a member of the supported set.
    RejectSupported,
}

impl VersionPolicy {
    pub fn accepts(&self, supported_versions: &BTreeSet<String>, version: &str) -> bool {
        let is_member = supported_versions.contains(version);
        match self {
            VersionPolicy::RequireSupported => is_member,
            VersionPolicy::RejectSupported => !is_member,
        }
    }
}

impl FromStr for VersionPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requireSupported" => Ok(VersionPolicy::RequireSupported),
            "rejectSupported" => Ok(VersionPolicy::RejectSupported),
            _ => Err(ConversionError::UnknownVersionPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub is_valid: bool,
    /// Failing fields in the operation's declared order.
    pub invalid_fields: Vec<Field>,
}

pub fn is_positive(value: FieldValue<'_>) -> bool {
    matches!(value, FieldValue::Count(count) if count > 0)
}

/// `true` when the text starts with `<digit>.<digit>`.
pub fn is_version_pattern(value: FieldValue<'_>) -> bool {
    matches!(value, FieldValue::Text(text) if VERSION_PATTERN.is_match(text))
}

type Predicate<'a> = Box<dyn Fn(FieldValue<'_>) -> bool + 'a>;

/// Per-field predicate lists. A field is valid only if every one of its predicates passes.
pub struct ParameterValidator<'a> {
    count_rules: Vec<Predicate<'a>>,
    version_rules: Vec<Predicate<'a>>,
    cluster_name_rules: Vec<Predicate<'a>>,
}

impl<'a> ParameterValidator<'a> {
    pub fn new(
        infrastructure: &'a dyn InfrastructureBackend,
        supported_versions: BTreeSet<String>,
        policy: VersionPolicy,
        max_nodes_per_role: i64,
    ) -> Self {
        let within_limit: Predicate<'a> = Box::new(move |value: FieldValue<'_>| matches!(value, FieldValue::Count(count) if count <= max_nodes_per_role));
        let version_support: Predicate<'a> = Box::new(move |value: FieldValue<'_>| match value {
            FieldValue::Text(version) => policy.accepts(&supported_versions, version),
            FieldValue::Count(_) => false,
        });
        let stack_exists: Predicate<'a> = Box::new(move |value: FieldValue<'_>| match value {
            FieldValue::Text(name) => infrastructure.stack_exists(name).unwrap_or_else(|e| {
                log::error!("StackLookupError: Could not check whether stack {} exists: {}", name, e);
                false
            }),
            FieldValue::Count(_) => false,
        });

        let positive: Predicate<'a> = Box::new(is_positive);
        let version_pattern: Predicate<'a> = Box::new(is_version_pattern);

        Self {
            count_rules: vec![positive, within_limit],
            version_rules: vec![version_pattern, version_support],
            cluster_name_rules: vec![stack_exists],
        }
    }

    fn rules(&self, field: Field) -> &[Predicate<'a>] {
        match field {
            Field::MasterCount | Field::InfraCount | Field::ComputeCount => &self.count_rules,
            Field::Version => &self.version_rules,
            Field::ClusterName => &self.cluster_name_rules,
        }
    }

    pub fn field_is_valid(&self, field: Field, value: FieldValue<'_>) -> bool {
        self.rules(field).iter().all(|predicate| predicate(value))
    }

    pub fn validate(&self, request: &OperationRequest) -> ValidationVerdict {
        let operation = request.operation();
        let invalid_fields: Vec<Field> = operation
            .required_fields()
            .iter()
            .copied()
            .filter(|field| match request.field_value(*field) {
                Some(value) => !self.field_is_valid(*field, value),
                None => true,
            })
            .collect();

        if !invalid_fields.is_empty() {
            log::warn!("Validation of {} rejected field(s): {:?}", operation, invalid_fields);
        }

        ValidationVerdict { is_valid: invalid_fields.is_empty(), invalid_fields }
    }
}
