mod conjunctive;
mod duplicate_variable;
mod pipeline;
