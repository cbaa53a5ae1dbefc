//! Claim-once forest assembly
//!
//! Nodes are addressed by position. A node can be claimed as a child at most
//! once, never by itself, and never by one of its own descendants. Every
//! claim keeps the structure a forest, so assembly needs no separate
//! cycle-breaking pass. Which member of a cyclic input ends up as the root
//! depends on the order claims are attempted.

/// Parent/child links of a forest under construction
#[derive(Debug, Clone)]
pub(crate) struct ClaimSet {
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

/// Why a claim was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refusal {
    SelfLoop,
    AlreadyClaimed,
    WouldCycle,
    OutOfRange,
}

impl ClaimSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parent: vec![None; len],
            children: vec![Vec::new(); len],
        }
    }

    /// Attach `child` under `parent`
    pub(crate) fn claim(&mut self, child: usize, parent: usize) -> Result<(), Refusal> {
        if child >= self.parent.len() || parent >= self.parent.len() {
            return Err(Refusal::OutOfRange);
        }
        if child == parent {
            return Err(Refusal::SelfLoop);
        }
        if self.parent[child].is_some() {
            return Err(Refusal::AlreadyClaimed);
        }
        if self.reaches(parent, child) {
            return Err(Refusal::WouldCycle);
        }
        self.parent[child] = Some(parent);
        self.children[parent].push(child);
        Ok(())
    }

    /// Whether walking claimed parents from `from` reaches `to`
    ///
    /// Claimed links are acyclic, so the walk always ends at a root.
    fn reaches(&self, from: usize, to: usize) -> bool {
        let mut current = Some(from);
        while let Some(pos) = current {
            if pos == to {
                return true;
            }
            current = self.parent[pos];
        }
        false
    }

    pub(crate) fn is_claimed(&self, pos: usize) -> bool {
        self.parent.get(pos).is_some_and(Option::is_some)
    }

    /// Unclaimed positions in ascending order
    pub(crate) fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.parent.len()).filter(|&pos| !self.is_claimed(pos))
    }

    /// Materialise owned trees bottom-up
    ///
    /// `make` receives a position and its already-built children, in claim
    /// order. Iterative so that deep chains cannot exhaust the stack.
    pub(crate) fn assemble<N>(
        &self,
        roots: impl IntoIterator<Item = usize>,
        mut make: impl FnMut(usize, Vec<N>) -> N,
    ) -> Vec<N> {
        let mut forest = Vec::new();

        for root in roots {
            // (position, next child to visit, children built so far)
            let mut stack: Vec<(usize, usize, Vec<N>)> = vec![(root, 0, Vec::new())];

            while let Some(frame) = stack.last_mut() {
                let (pos, next) = (frame.0, frame.1);
                if let Some(&child) = self.children[pos].get(next) {
                    frame.1 += 1;
                    let capacity = self.children[child].len();
                    stack.push((child, 0, Vec::with_capacity(capacity)));
                    continue;
                }

                let Some((pos, _, built)) = stack.pop() else {
                    break;
                };
                let node = make(pos, built);
                match stack.last_mut() {
                    Some(parent) => parent.2.push(node),
                    None => forest.push(node),
                }
            }
        }

        forest
    }
}
