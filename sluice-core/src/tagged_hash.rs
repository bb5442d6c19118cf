//! Discriminated unions over hash schemas.

use crate::ast::{Node, Tag};
use crate::error::BuildError;
use crate::hash::HashSchema;
use crate::outcome::Outcome;
use crate::step::{Step, Type};
use crate::value::Value;

/// Dispatches to one of several hash-schema variants by the literal
/// value each declares at a discriminator key.
///
/// Construction verifies, per variant, that the key is declared and
/// that its type resolves to a static literal; both checks fail the
/// builder call rather than a later `call`.
#[derive(Debug, Clone)]
pub struct TaggedHash {
    base: HashSchema,
    key: String,
    variants: Vec<(Value, HashSchema)>,
}

impl TaggedHash {
    /// Builds a tagged union from a base schema, a discriminator key,
    /// and a non-empty list of variants.
    pub fn new(
        base: HashSchema,
        key: &str,
        variants: Vec<HashSchema>,
    ) -> Result<Self, BuildError> {
        if variants.is_empty() {
            return Err(BuildError::EmptyTaggedUnion);
        }
        let mut tagged = Vec::with_capacity(variants.len());
        for (index, variant) in variants.into_iter().enumerate() {
            let Some(field) = variant.field(key) else {
                return Err(BuildError::MissingTagKey {
                    key: key.to_string(),
                    index,
                });
            };
            let literal = static_literal(&field.ast()).ok_or_else(|| BuildError::NonStaticTag {
                key: key.to_string(),
                index,
            })?;
            tagged.push((literal, variant));
        }
        Ok(Self {
            base,
            key: key.to_string(),
            variants: tagged,
        })
    }
}

/// Reads the literal a field type pins its value to: the `value` attr
/// of the first `static` or `value` node in its AST.
fn static_literal(node: &Node) -> Option<Value> {
    node.find(Tag::Static)
        .or_else(|| node.find(Tag::Value))
        .and_then(|n| n.attrs.get("value").cloned())
}

impl Step for TaggedHash {
    fn call(&self, outcome: Outcome) -> Outcome {
        let based = self.base.call(outcome);
        if based.is_halt() {
            return based;
        }
        let tag = based.value().get(&self.key).clone();
        match self.variants.iter().find(|(literal, _)| literal == &tag) {
            Some((_, variant)) => variant.call(based),
            None => {
                tracing::trace!(key = %self.key, value = %tag, "no variant matched");
                let expected = self
                    .variants
                    .iter()
                    .map(|(literal, _)| match literal {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                based.halt(format!("expected :{} to be one of {expected}", self.key))
            }
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::TaggedHash)
            .attr("type", "Hash")
            .attr("key", self.key.as_str())
            .children(self.variants.iter().map(|(_, variant)| variant.ast()))
    }
}

impl From<TaggedHash> for Type {
    fn from(tagged: TaggedHash) -> Self {
        Type::new(tagged)
    }
}
