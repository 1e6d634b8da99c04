//! Node/link states, priority ordering and objective weighting (§3).

use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    None,
    CaPlus,
    Ca,
    Cr,
    CrMinus,
}

impl NodeState {
    pub fn is_positive(self) -> bool {
        matches!(self, NodeState::CaPlus | NodeState::Ca)
    }

    pub fn is_negative(self) -> bool {
        matches!(self, NodeState::Cr | NodeState::CrMinus)
    }

    /// the boosted counterpart: `Ca -> Ca+`, `Cr -> Cr-`, anything else unchanged
    pub fn boosted(self) -> NodeState {
        match self {
            NodeState::Ca => NodeState::CaPlus,
            NodeState::Cr => NodeState::CrMinus,
            other => other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    Active,
    Boosted,
    Blocked,
}

/// total order over `{Ca+, Ca, Cr, Cr-}`, supplied as configuration.
/// `None` always compares lowest.
#[derive(Clone, Copy, Debug)]
pub struct Priority {
    rank: [i32; 5],
    pub monotonic: bool,
    pub submodular: bool,
}

fn idx(s: NodeState) -> usize {
    match s {
        NodeState::None => 0,
        NodeState::CaPlus => 1,
        NodeState::Ca => 2,
        NodeState::Cr => 3,
        NodeState::CrMinus => 4,
    }
}

impl Priority {
    /// `ca_plus, ca, cr, cr_minus` must be a permutation of `0..4`; higher is
    /// higher priority. panics (programming error, per §7 Internal) otherwise.
    pub fn new(ca_plus: i32, ca: i32, cr: i32, cr_minus: i32) -> Self {
        let mask = (1 << ca_plus) | (1 << ca) | (1 << cr) | (1 << cr_minus);
        assert_eq!(mask, 0b1111, "priority values must be a permutation of 0..4");

        let mut rank = [0i32; 5];
        rank[0] = -1;
        rank[idx(NodeState::CaPlus)] = ca_plus;
        rank[idx(NodeState::Ca)] = ca;
        rank[idx(NodeState::Cr)] = cr;
        rank[idx(NodeState::CrMinus)] = cr_minus;

        let mut p = Self {
            rank,
            monotonic: true,
            submodular: false,
        };
        p.monotonic = p.classify_monotonic();
        p.submodular = p.classify_submodular();
        p
    }

    /// canonical upper-bound priority `Ca+ > Cr- > Cr > Ca`, used by SA-IMM
    /// to bound the objective via a PR-IMM run.
    pub fn upper_bound() -> Self {
        Self::new(3, 0, 1, 2)
    }

    pub fn rank_of(&self, s: NodeState) -> i32 {
        self.rank[idx(s)]
    }

    /// `Ordering::Greater` means `a` has higher priority than `b`
    pub fn compare(&self, a: NodeState, b: NodeState) -> Ordering {
        self.rank_of(a).cmp(&self.rank_of(b))
    }

    fn classify_monotonic(&self) -> bool {
        use NodeState::*;
        let gt = |x: NodeState, y: NodeState| self.compare(x, y) == Ordering::Greater;
        !((gt(Ca, Cr) && gt(Cr, CaPlus))
            || (gt(Ca, CrMinus) && gt(CrMinus, CaPlus))
            || (gt(CrMinus, CaPlus) && gt(CaPlus, Cr))
            || (gt(CrMinus, Ca) && gt(Ca, Cr)))
    }

    fn classify_submodular(&self) -> bool {
        let cases = [(3, 2, 0, 1), (3, 0, 1, 2), (1, 0, 2, 3)];
        cases
            .iter()
            .any(|&(cp, ca, cr, cm)| self.rank == Self::new_rank(cp, ca, cr, cm))
    }

    fn new_rank(ca_plus: i32, ca: i32, cr: i32, cr_minus: i32) -> [i32; 5] {
        let mut rank = [0i32; 5];
        rank[0] = -1;
        rank[idx(NodeState::CaPlus)] = ca_plus;
        rank[idx(NodeState::Ca)] = ca;
        rank[idx(NodeState::Cr)] = cr;
        rank[idx(NodeState::CrMinus)] = cr_minus;
        rank
    }

    /// parses a 4-token priority string, e.g. `"Ca+ > Cr- > Cr > Ca"` or
    /// `"cr+,cr,ca+,ca"`, space/comma/`>`-separated, case-insensitive.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let tokens: Vec<&str> = s
            .split(|c: char| c == ' ' || c == ',' || c == '>')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() != 4 {
            return Err(crate::Error::Argument(format!(
                "priority must have exactly 4 tokens, got {}: {s:?}",
                tokens.len()
            )));
        }
        let mut rank = [-1i32; 4];
        let mut next = 3i32;
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            let which = match lower.as_str() {
                "ca+" => 0,
                "ca" => 1,
                "cr" => 2,
                "cr-" => 3,
                other => {
                    return Err(crate::Error::Argument(format!(
                        "unrecognized priority token: {other:?}"
                    )))
                }
            };
            if rank[which] != -1 {
                return Err(crate::Error::Argument(format!(
                    "repeated priority token: {token:?}"
                )));
            }
            rank[which] = next;
            next -= 1;
        }
        Ok(Self::new(rank[0], rank[1], rank[2], rank[3]))
    }
}

/// gain(state) per §3: `gain(Ca+)=gain(Ca)=lambda`, `gain(Cr)=lambda-1`,
/// `gain(Cr-)=gain(None)=0`.
pub fn gain(state: NodeState, lambda: f64) -> f64 {
    match state {
        NodeState::None => 0.0,
        NodeState::CaPlus | NodeState::Ca => lambda,
        NodeState::Cr => lambda - 1.0,
        NodeState::CrMinus => 0.0,
    }
}

/// draws `Active` w.p. `p`, `Boosted` w.p. `pb-p`, `Blocked` w.p. `1-pb`,
/// given `r` uniform in `[0, 1)`.
pub fn sample_link_state(r: f64, p: f64, pb: f64) -> LinkState {
    if r < p {
        LinkState::Active
    } else if r < pb {
        LinkState::Boosted
    } else {
        LinkState::Blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_is_monotonic_and_submodular() {
        let p = Priority::upper_bound();
        assert!(p.monotonic);
        assert!(p.submodular);
    }

    #[test]
    fn parse_accepts_symbols_and_case() {
        let p = Priority::parse("ca+ > cr- > cr > ca").unwrap();
        assert_eq!(p.rank_of(NodeState::CaPlus), 3);
        assert_eq!(p.rank_of(NodeState::Ca), 0);
        let q = Priority::parse("Cr+,cr,CA+,ca").unwrap_err();
        assert!(matches!(q, crate::Error::Argument(_)));
    }

    #[test]
    fn parse_rejects_non_permutation() {
        assert!(Priority::parse("ca+ ca+ ca cr").is_err());
        assert!(Priority::parse("ca+ ca cr").is_err());
    }

    #[test]
    fn gain_values_match_spec() {
        assert_eq!(gain(NodeState::None, 0.5), 0.0);
        assert_eq!(gain(NodeState::Ca, 0.5), 0.5);
        assert_eq!(gain(NodeState::CaPlus, 0.5), 0.5);
        assert_eq!(gain(NodeState::Cr, 0.5), -0.5);
        assert_eq!(gain(NodeState::CrMinus, 0.5), 0.0);
    }

    #[test]
    fn link_state_sampling_law() {
        assert_eq!(sample_link_state(0.1, 0.3, 0.6), LinkState::Active);
        assert_eq!(sample_link_state(0.4, 0.3, 0.6), LinkState::Boosted);
        assert_eq!(sample_link_state(0.7, 0.3, 0.6), LinkState::Blocked);
    }
}
