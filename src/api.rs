//! Wire-level API clients for LLM providers.

pub mod gemini;
