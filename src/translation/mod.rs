/*!
 * Context-preserving batch translation of timed transcript segments.
 *
 * The pipeline is split into several submodules:
 *
 * - `batch`: deterministic partition of segments into fixed-size batches
 * - `context`: rolling textual context carried between rounds
 * - `prompts`: system prompts and request payload builders
 * - `core`: the Translator and its bounded-concurrency round executor
 */

pub use self::core::Translator;

pub mod batch;
pub mod context;
pub mod core;
pub mod prompts;
