use crate::graph::Coloring;

mod backtracking;

pub use backtracking::BacktrackingColoring;

/// Outcome of testing whether a graph admits a coloring with a given number of colors.
#[derive(Clone, Debug)]
pub enum Feasibility {
    Feasible(Coloring),
    Infeasible,
    /// The search was interrupted before it could decide.
    Aborted,
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible(_))
    }

    pub fn coloring(self) -> Option<Coloring> {
        match self {
            Feasibility::Feasible(coloring) => Some(coloring),
            _ => None,
        }
    }
}
