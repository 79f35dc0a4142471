mod rule_based;

pub use rule_based::RuleBasedInterpreter;
