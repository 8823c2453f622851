//! Effect system: what resolving objects do, and who they may target.
//!
//! - `Effect`: Closed vocabulary of effects stored on stack objects
//! - `TargetSpec` / `TargetFilter`: How targets are chosen
//! - `EffectExecutor`: Applies an effect to state (content-layer seam)
//! - `LegalityChecker`: Validates targets, attackers, blockers, and
//!   attachments (content-layer seam)
//!
//! ## Design Philosophy
//!
//! The rules core never looks inside an `Effect`. It stores it on the
//! stack, re-validates targets at resolution, and hands the effect to the
//! executor. `BasicEffects` and `BasicLegality` are the default
//! implementations; a content layer can swap in its own.

mod effect;
mod executor;
mod legality;
mod targeting;

pub use effect::{Effect, Recipient};
pub use executor::{BasicEffects, EffectExecutor, EffectOutcome, ResolverCommand};
pub use legality::{BasicLegality, Legality, LegalityChecker};
pub use targeting::{TargetCount, TargetFilter, TargetSpec};
