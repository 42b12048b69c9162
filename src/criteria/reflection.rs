// Tue Jan 13 2026 - Alex

use crate::criteria::{guarded, CriterionError};
use crate::inspect::InspectedModule;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionVerdict {
    Keep,
    Reject { complaints: Vec<String> },
}

impl ReflectionVerdict {
    pub fn reject(complaint: impl Into<String>) -> Self {
        ReflectionVerdict::Reject {
            complaints: vec![complaint.into()],
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, ReflectionVerdict::Keep)
    }
}

pub type ReflectionPredicate =
    dyn Fn(&InspectedModule) -> Result<ReflectionVerdict, CriterionError> + Send + Sync;

/// Inclusion test over an inspected module's exported types.
#[derive(Clone)]
pub enum ReflectionCriterion {
    /// Keep when some exported concrete type is assignable to any of the listed types
    LoadTypesAssignableFrom(Vec<String>),
    Custom {
        name: String,
        predicate: Arc<ReflectionPredicate>,
    },
}

impl ReflectionCriterion {
    pub fn load_types_assignable_from(base_type: &str) -> Self {
        ReflectionCriterion::LoadTypesAssignableFrom(vec![base_type.to_string()])
    }

    pub fn load_types_assignable_from_any<I, S>(base_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReflectionCriterion::LoadTypesAssignableFrom(base_types.into_iter().map(Into::into).collect())
    }

    pub fn custom<F>(name: &str, predicate: F) -> Self
    where
        F: Fn(&InspectedModule) -> Result<ReflectionVerdict, CriterionError> + Send + Sync + 'static,
    {
        ReflectionCriterion::Custom {
            name: name.to_string(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ReflectionCriterion::LoadTypesAssignableFrom(_) => "LoadTypesAssignableFrom",
            ReflectionCriterion::Custom { name, .. } => name,
        }
    }

    pub fn evaluate(&self, module: &InspectedModule) -> Result<ReflectionVerdict, CriterionError> {
        guarded(self.name(), || self.evaluate_unguarded(module))
    }

    fn evaluate_unguarded(&self, module: &InspectedModule) -> Result<ReflectionVerdict, CriterionError> {
        match self {
            ReflectionCriterion::LoadTypesAssignableFrom(base_types) => {
                for base in base_types {
                    if let Some(ty) = module.concrete_types_assignable_to(base).next() {
                        log::trace!("{}: {} is assignable to {}", module.name(), ty.name, base);
                        return Ok(ReflectionVerdict::Keep);
                    }
                }

                Ok(ReflectionVerdict::Reject {
                    complaints: base_types
                        .iter()
                        .map(|base| {
                            format!(
                                "{} exports no concrete type assignable to {}",
                                module.name(),
                                base
                            )
                        })
                        .collect(),
                })
            }
            ReflectionCriterion::Custom { predicate, .. } => predicate(module),
        }
    }
}

impl fmt::Debug for ReflectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReflectionCriterion::LoadTypesAssignableFrom(bases) => {
                f.debug_tuple("LoadTypesAssignableFrom").field(bases).finish()
            }
            ReflectionCriterion::Custom { name, .. } => write!(f, "Custom({})", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::ExportedType;
    use std::path::Path;

    fn module(types: Vec<ExportedType>) -> InspectedModule {
        InspectedModule::new(Path::new("/bin/Streams.dll"), "Streams", types)
    }

    #[test]
    fn test_assignable_keeps() {
        let criterion = ReflectionCriterion::load_types_assignable_from("Runtime.IProvider");
        let m = module(vec![ExportedType::class("Streams.SmsProvider").with_interface("Runtime.IProvider")]);

        assert_eq!(criterion.evaluate(&m).unwrap(), ReflectionVerdict::Keep);
    }

    #[test]
    fn test_abstract_and_interfaces_do_not_count() {
        let criterion = ReflectionCriterion::load_types_assignable_from("Runtime.IProvider");
        let m = module(vec![
            ExportedType::interface("Streams.IStreamProvider").with_interface("Runtime.IProvider"),
            ExportedType::class("Streams.ProviderBase")
                .with_interface("Runtime.IProvider")
                .as_abstract(),
        ]);

        match criterion.evaluate(&m).unwrap() {
            ReflectionVerdict::Reject { complaints } => {
                assert_eq!(complaints.len(), 1);
                assert!(complaints[0].contains("Runtime.IProvider"));
            }
            ReflectionVerdict::Keep => panic!("abstract types must not satisfy the criterion"),
        }
    }

    #[test]
    fn test_any_of_several_bases() {
        let criterion = ReflectionCriterion::load_types_assignable_from_any(["Runtime.ISerializer", "Runtime.IProvider"]);
        let m = module(vec![ExportedType::class("Streams.Codec").with_base("Runtime.ISerializer")]);

        assert!(criterion.evaluate(&m).unwrap().is_keep());
    }

    #[test]
    fn test_custom_panic_is_error() {
        let criterion = ReflectionCriterion::custom("Exploding", |_| panic!("Inner Exception #2"));

        match criterion.evaluate(&module(Vec::new())) {
            Err(CriterionError::Panicked { message, .. }) => assert_eq!(message, "Inner Exception #2"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
