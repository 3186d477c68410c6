//! Integration test suite.
//!
//! 1. Schema building and XML round trips
//! 2. Record assembly and decoding scenarios
//! 3. Field copying between schemas
//! 4. Output cache delivery
//! 5. Codec properties

pub mod copier_tests;
pub mod output_tests;
pub mod property_tests;
pub mod record_tests;
