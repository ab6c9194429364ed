// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - provider access, identification and tier probing.

pub mod identify;
pub mod prompt;
pub mod provider;
pub mod response;
pub mod retry;
pub mod tier;

pub use identify::{IdentificationClient, ModelSelection};
pub use prompt::PromptTemplate;
pub use provider::ProviderClient;
pub use retry::RetryPolicy;
pub use tier::TierProber;
