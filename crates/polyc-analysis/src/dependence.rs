//! Dependence analysis: flow (RAW), anti (WAR), and output (WAW) relations.

use polyc_core::PrimFunc;
use polyc_isl::{Context, UnionMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::build_accesses;
use crate::builder::build_schedule;
use crate::error::AnalysisError;

/// The three dependence classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepKind {
    Raw,
    War,
    Waw,
}

impl DepKind {
    pub const ALL: [DepKind; 3] = [DepKind::Raw, DepKind::War, DepKind::Waw];

    pub fn as_str(self) -> &'static str {
        match self {
            DepKind::Raw => "RAW",
            DepKind::War => "WAR",
            DepKind::Waw => "WAW",
        }
    }
}

impl std::fmt::Display for DepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All three dependence relations of a function, keyed by [`DepKind`].
pub struct Dependences<'ctx> {
    pub raw: UnionMap<'ctx>,
    pub war: UnionMap<'ctx>,
    pub waw: UnionMap<'ctx>,
}

impl<'ctx> Dependences<'ctx> {
    pub fn get(&self, kind: DepKind) -> &UnionMap<'ctx> {
        match kind {
            DepKind::Raw => &self.raw,
            DepKind::War => &self.war,
            DepKind::Waw => &self.waw,
        }
    }

    /// The union of all three relations.
    pub fn union_all(&self) -> Result<UnionMap<'ctx>, AnalysisError> {
        Ok(self.raw.union(&self.war)?.union(&self.waw)?)
    }
}

/// The strict happens-before relation of a schedule with itself:
/// `{ a -> b : S(a) lexicographically precedes S(b) }`. Strictness removes
/// self-pairs.
pub fn happens_before<'ctx>(schedule: &UnionMap<'ctx>) -> Result<UnionMap<'ctx>, AnalysisError> {
    Ok(schedule.lex_lt_union_map(schedule)?)
}

/// RAW: a write followed by a read of the same location.
pub fn raw_dependence<'ctx>(
    schedule: &UnionMap<'ctx>,
    writes: &UnionMap<'ctx>,
    reads: &UnionMap<'ctx>,
) -> Result<UnionMap<'ctx>, AnalysisError> {
    let same_location = writes.apply_range(&reads.reverse()?)?;
    Ok(same_location.intersect(&happens_before(schedule)?)?)
}

/// WAR: a read followed by a write of the same location.
pub fn war_dependence<'ctx>(
    schedule: &UnionMap<'ctx>,
    writes: &UnionMap<'ctx>,
    reads: &UnionMap<'ctx>,
) -> Result<UnionMap<'ctx>, AnalysisError> {
    let same_location = reads.apply_range(&writes.reverse()?)?;
    Ok(same_location.intersect(&happens_before(schedule)?)?)
}

/// WAW: two writes of the same location.
pub fn waw_dependence<'ctx>(
    schedule: &UnionMap<'ctx>,
    writes: &UnionMap<'ctx>,
) -> Result<UnionMap<'ctx>, AnalysisError> {
    let same_location = writes.apply_range(&writes.reverse()?)?;
    Ok(same_location.intersect(&happens_before(schedule)?)?)
}

/// Builds accesses and the identity schedule, then all three dependence
/// relations.
pub fn all_dependences<'ctx>(
    ctx: &'ctx Context,
    func: &PrimFunc,
) -> Result<Dependences<'ctx>, AnalysisError> {
    let schedule = build_schedule(ctx, func)?;
    let accesses = build_accesses(ctx, func)?;
    dependences_for(&schedule, &accesses.writes, &accesses.reads, &func.name)
}

/// Dependences under an explicit schedule and access pair.
pub fn dependences_for<'ctx>(
    schedule: &UnionMap<'ctx>,
    writes: &UnionMap<'ctx>,
    reads: &UnionMap<'ctx>,
    function: &str,
) -> Result<Dependences<'ctx>, AnalysisError> {
    let deps = Dependences {
        raw: raw_dependence(schedule, writes, reads)?,
        war: war_dependence(schedule, writes, reads)?,
        waw: waw_dependence(schedule, writes)?,
    };
    debug!(
        function,
        raw = %deps.raw.to_str(),
        war = %deps.war.to_str(),
        waw = %deps.waw.to_str(),
        "computed dependences"
    );
    Ok(deps)
}
