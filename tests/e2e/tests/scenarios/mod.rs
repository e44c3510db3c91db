//! End-to-end scenario suite, one module per numbered scenario group from
//! the component specification's testable-properties section.

mod bank_scenarios;
mod inference_scenarios;
mod invariants;
mod loop_scenarios;
mod store_scenarios;
