//! Batch parse and build over one frozen model.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::model::Definition;
use crate::options::ParseOptions;
use crate::value::Value;
use crate::{decode, Result};

/// Parses and builds every document independently. Results keep the input
/// order; a fault in one document does not affect the others.
pub fn build_all<S>(
    inputs: &[S],
    definition: &Definition,
    root: Option<&str>,
    options: &ParseOptions,
) -> Vec<Result<Value>>
where
    S: AsRef<str> + Sync,
{
    let root = match definition.root(root) {
        Ok(root) => root,
        Err(err) => return inputs.iter().map(|_| Err(err.clone())).collect(),
    };
    map_items_parallel(inputs, |input| {
        let item = decode::from_str(input.as_ref(), definition.model(), root.clone(), options)?;
        definition.build(&item)
    })
}

#[cfg(feature = "parallel")]
fn map_items_parallel<T, R, F>(items: &[T], func: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(func).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_items_parallel<T, R, F>(items: &[T], func: F) -> Vec<R>
where
    F: Fn(&T) -> R,
{
    items.iter().map(func).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use crate::options::CastingLevel;

    #[rstest::rstest]
    fn test_build_all_keeps_order_and_isolates_faults() {
        let definition = Definition::new(Model::basic("batch"), CastingLevel::Never).unwrap();
        let inputs = ["1", "x", " 3 "];
        let results = build_all(&inputs, &definition, Some("int"), &ParseOptions::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &Value::Int(1));
        assert!(results[1].as_ref().unwrap_err().is_build());
        assert_eq!(results[2].as_ref().unwrap(), &Value::Int(3));
    }

    #[rstest::rstest]
    fn test_unknown_root_fails_every_input() {
        let definition = Definition::new(Model::basic("batch"), CastingLevel::Never).unwrap();
        let results = build_all(&["1", "2"], &definition, Some("Nope"), &ParseOptions::default());
        assert!(results.iter().all(|result| result.is_err()));
    }
}
