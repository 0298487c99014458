pub mod lmi;
pub mod lvr;

pub use lmi::{calculate_lmi, LmiBand, LmiTable};
pub use lvr::{calculate_lvr, LvrAssessment, LvrCalculator};
