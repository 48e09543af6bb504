//! Identifier consistency checks over a parsed IDL.
//!
//! Codes are wire-visible and must be unambiguous: a cluster code maps to a
//! single cluster, and within a cluster an attribute, command, command
//! response or event code maps to a single element of that namespace.

use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, warn};

use crate::idl::Idl;
use crate::{Cluster, Namespace};

/// A single identifier problem found while validating an IDL.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("cluster code 0x{code:04X} is used by both {first} and {second}")]
    #[diagnostic(code(matter_ids::idl::validate::duplicate_cluster_code))]
    DuplicateClusterCode {
        code: u64,
        first: String,
        second: String,
    },

    #[error("cluster {name} is defined more than once")]
    #[diagnostic(code(matter_ids::idl::validate::duplicate_cluster_name))]
    DuplicateClusterName { name: String },

    #[error("{namespace} code 0x{code:04X} in cluster {cluster} is used by both {first} and {second}")]
    #[diagnostic(code(matter_ids::idl::validate::duplicate_code))]
    DuplicateCode {
        cluster: String,
        namespace: Namespace,
        code: u64,
        first: String,
        second: String,
    },

    #[error("{namespace} {name} is defined more than once in cluster {cluster}")]
    #[diagnostic(code(matter_ids::idl::validate::duplicate_name))]
    DuplicateName {
        cluster: String,
        namespace: Namespace,
        name: String,
    },

    #[error("{namespace} {name} in cluster {cluster} has code 0x{code:X}, which does not fit in 32 bits")]
    #[diagnostic(code(matter_ids::idl::validate::out_of_range))]
    CodeOutOfRange {
        cluster: String,
        namespace: Namespace,
        name: String,
        code: u64,
    },

    #[error("cluster {cluster} has revision {revision}, which does not fit in 16 bits")]
    #[diagnostic(code(matter_ids::idl::validate::revision_out_of_range))]
    RevisionOutOfRange { cluster: String, revision: u64 },
}

/// All issues found while validating an IDL.
#[derive(Error, Debug, Diagnostic)]
#[error("IDL contains {} invalid identifier(s)", .issues.len())]
#[diagnostic(
    code(matter_ids::idl::validate::failure),
    help("Identifiers must be unique within their scope, ignoring case, and fit in 32 bits")
)]
pub struct IdlValidationError {
    #[related]
    pub issues: Vec<ValidationIssue>,
}

const SCOPED_NAMESPACES: [Namespace; 4] = [
    Namespace::Attribute,
    Namespace::Command,
    Namespace::CommandResponse,
    Namespace::Event,
];

fn check_range(
    cluster: &str,
    namespace: Namespace,
    name: &str,
    code: u64,
    issues: &mut Vec<ValidationIssue>,
) {
    if u32::try_from(code).is_err() {
        issues.push(ValidationIssue::CodeOutOfRange {
            cluster: cluster.into(),
            namespace,
            name: name.into(),
            code,
        });
    }
}

impl Cluster {
    /// Appends every issue found in this cluster to `issues`.
    pub fn collect_issues(&self, issues: &mut Vec<ValidationIssue>) {
        check_range(&self.id, Namespace::Cluster, &self.id, self.code, issues);

        if u16::try_from(self.revision).is_err() {
            issues.push(ValidationIssue::RevisionOutOfRange {
                cluster: self.id.clone(),
                revision: self.revision,
            });
        }

        for namespace in SCOPED_NAMESPACES {
            let mut by_code: HashMap<u64, &str> = HashMap::new();
            let mut by_name: HashMap<String, u64> = HashMap::new();

            for (name, code) in self.codes(namespace) {
                check_range(&self.id, namespace, name, code, issues);

                if by_name.insert(name.to_ascii_lowercase(), code).is_some() {
                    issues.push(ValidationIssue::DuplicateName {
                        cluster: self.id.clone(),
                        namespace,
                        name: name.into(),
                    });
                    continue;
                }

                if let Some(first) = by_code.insert(code, name) {
                    issues.push(ValidationIssue::DuplicateCode {
                        cluster: self.id.clone(),
                        namespace,
                        code,
                        first: first.into(),
                        second: name.into(),
                    });
                }
            }
        }
    }
}

impl Idl {
    /// Checks that every identifier is unique within its scope and fits the
    /// 32-bit wire representation, and that cluster revisions fit in 16 bits.
    ///
    /// Names are compared ignoring ASCII case.
    ///
    /// All issues are collected rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), IdlValidationError> {
        let mut issues = Vec::new();
        let mut by_code: HashMap<u64, &str> = HashMap::new();
        let mut by_name: HashMap<String, u64> = HashMap::new();

        for cluster in &self.clusters {
            if by_name
                .insert(cluster.id.to_ascii_lowercase(), cluster.code)
                .is_some()
            {
                issues.push(ValidationIssue::DuplicateClusterName {
                    name: cluster.id.clone(),
                });
            } else if let Some(first) = by_code.insert(cluster.code, &cluster.id) {
                issues.push(ValidationIssue::DuplicateClusterCode {
                    code: cluster.code,
                    first: first.into(),
                    second: cluster.id.clone(),
                });
            }

            cluster.collect_issues(&mut issues);
        }

        if issues.is_empty() {
            debug!("Validated {} clusters", self.clusters.len());
            Ok(())
        } else {
            for issue in &issues {
                warn!("IDL validation: {}", issue);
            }
            Err(IdlValidationError { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(input: &str) -> Idl {
        Idl::parse(input.into()).expect("valid input")
    }

    #[test]
    fn valid_idl_passes() {
        let idl = parse(include_str!("./test_input1.matter"));
        assert!(idl.validate().is_ok());
    }

    #[test]
    fn command_and_response_may_share_a_code() {
        let idl = parse(
            "
            cluster Groups = 4 {
              response struct AddGroupResponse = 0 { enum8 status = 0; }
              command AddGroup(AddGroupRequest): AddGroupResponse = 0;
            }
            ",
        );
        assert!(idl.validate().is_ok());
    }

    #[test]
    fn same_code_in_different_clusters_is_fine() {
        let idl = parse(
            "
            cluster OnOff = 6 { readonly attribute boolean onOff = 0; }
            cluster LevelControl = 8 { readonly attribute nullable int8u currentLevel = 0; }
            ",
        );
        assert!(idl.validate().is_ok());
    }

    #[rstest]
    #[case(
        "cluster A = 1 { attribute int8u x = 1; attribute int8u y = 1; }",
        ValidationIssue::DuplicateCode {
            cluster: "A".into(),
            namespace: Namespace::Attribute,
            code: 1,
            first: "x".into(),
            second: "y".into(),
        }
    )]
    #[case(
        "cluster A = 1 { info event E = 0 {} info event E = 1 {} }",
        ValidationIssue::DuplicateName {
            cluster: "A".into(),
            namespace: Namespace::Event,
            name: "E".into(),
        }
    )]
    #[case(
        "cluster A = 1 { command C(): DefaultSuccess = 0x100000000; }",
        ValidationIssue::CodeOutOfRange {
            cluster: "A".into(),
            namespace: Namespace::Command,
            name: "C".into(),
            code: 0x1_0000_0000,
        }
    )]
    #[case(
        "cluster A = 1 {} cluster B = 1 {}",
        ValidationIssue::DuplicateClusterCode {
            code: 1,
            first: "A".into(),
            second: "B".into(),
        }
    )]
    #[case(
        "cluster A = 1 {} cluster A = 2 {}",
        ValidationIssue::DuplicateClusterName { name: "A".into() }
    )]
    #[case(
        "cluster OnOff = 6 {} cluster ONOFF = 7 {}",
        ValidationIssue::DuplicateClusterName { name: "ONOFF".into() }
    )]
    #[case(
        "cluster A = 1 { attribute boolean onOff = 0; attribute boolean OnOff = 1; }",
        ValidationIssue::DuplicateName {
            cluster: "A".into(),
            namespace: Namespace::Attribute,
            name: "OnOff".into(),
        }
    )]
    #[case(
        "cluster A = 1 { command reset(): DefaultSuccess = 0; command Reset(): DefaultSuccess = 1; }",
        ValidationIssue::DuplicateName {
            cluster: "A".into(),
            namespace: Namespace::Command,
            name: "Reset".into(),
        }
    )]
    #[case(
        "cluster A = 1 { revision 65536; }",
        ValidationIssue::RevisionOutOfRange {
            cluster: "A".into(),
            revision: 65536,
        }
    )]
    fn single_issue(#[case] input: &str, #[case] expected: ValidationIssue) {
        let err = parse(input).validate().expect_err("invalid idl");
        assert_eq!(err.issues, vec![expected]);
    }

    #[test]
    fn largest_revision_is_accepted() {
        let idl = parse("cluster A = 1 { revision 65535; }");
        assert!(idl.validate().is_ok());
    }

    #[test]
    fn all_issues_are_collected() {
        let err = parse(
            "
            cluster A = 1 {
              attribute int8u x = 1;
              attribute int8u y = 1;
              command C(): DefaultSuccess = 0;
              command D(): DefaultSuccess = 0;
            }
            ",
        )
        .validate()
        .expect_err("invalid idl");

        assert_eq!(err.issues.len(), 2);
        assert_eq!(err.to_string(), "IDL contains 2 invalid identifier(s)");
    }
}
