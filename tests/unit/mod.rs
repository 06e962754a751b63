pub mod hatom_rules_tests;
pub mod report_tests;
