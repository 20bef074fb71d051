//! Rule compilation and indexing.
//!
//! The rule table is built once (see `api.rs`) and then shared by every
//! matcher. Compiling derives cheap per-rule metadata so a line only tries the
//! rules that could possibly match it.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `CompiledRules::rules` and `CompiledRules::metas`.
//!   Those vectors must stay aligned.
//! - Ids are assigned in table order, and `active_for` returns them in
//!   ascending order: gating never changes which rule wins a line, it only
//!   skips rules whose buckets are absent (buckets are necessary conditions of
//!   the rule's regex).

use crate::Rule;

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Coarse buckets for fast line classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BucketMask: u32 {
        const HAS_DIGITS = 1 << 0;
        const HAS_ALPHA  = 1 << 1;
        const HAS_COMMA  = 1 << 2;
        /// Any of `= + - : / . # & *`.
        const HAS_SYMBOL = 1 << 3;
        const HAS_SPACE  = 1 << 4;
    }
}

/// Metadata attached to a rule.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RuleMeta {
    pub(crate) buckets: BucketMask,
}

/// Pre-compiled rule set with metadata.
#[derive(Debug)]
pub(crate) struct CompiledRules<'a> {
    pub(crate) rules: Vec<&'a Rule>,
    pub(crate) metas: Vec<RuleMeta>,
}

impl<'a> CompiledRules<'a> {
    pub(crate) fn new(rules: &'a [Rule]) -> Self {
        let rule_refs: Vec<&Rule> = rules.iter().collect();
        let metas: Vec<RuleMeta> =
            rule_refs.iter().map(|r| RuleMeta { buckets: BucketMask::from_bits_truncate(r.buckets) }).collect();
        CompiledRules { rules: rule_refs, metas }
    }

    /// Ids of the rules whose buckets are all present in `buckets`, in table order.
    pub(crate) fn active_for(&self, buckets: BucketMask) -> Vec<RuleId> {
        self.metas.iter().enumerate().filter(|(_, meta)| buckets.contains(meta.buckets)).map(|(id, _)| id).collect()
    }

    pub(crate) fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_rules_keep_table_order() {
        let rules = vec![
            rule! { name: "needs comma", pattern: re!(r"^,$"), buckets: BucketMask::HAS_COMMA.bits() },
            rule! { name: "always", pattern: re!(r"^x$") },
            rule! {
                name: "needs alpha+digits",
                pattern: re!(r"^a1$"),
                buckets: BucketMask::HAS_ALPHA.bits() | BucketMask::HAS_DIGITS.bits(),
            },
        ];
        let compiled = CompiledRules::new(&rules);
        assert!(compiled.metas[1].buckets.is_empty());

        let ids = compiled.active_for(BucketMask::HAS_ALPHA | BucketMask::HAS_DIGITS);
        assert_eq!(ids, vec![1, 2]);

        let ids = compiled.active_for(BucketMask::all());
        assert_eq!(ids, vec![0, 1, 2]);

        let ids = compiled.active_for(BucketMask::HAS_DIGITS);
        assert_eq!(ids, vec![1]);
    }
}
