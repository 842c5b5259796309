// src/generator/invoker.rs

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{ArgumentMap, DescriptorGenerator, GeneratorError, Signature};
use crate::environment::GenerationEnv;

/// Candidate arguments split by whether the generator accepts them.
#[derive(Debug, Default, PartialEq)]
pub struct Partitioned {
    pub accepted: ArgumentMap,
    pub rejected: ArgumentMap,
}

pub fn partition(signature: &Signature, args: ArgumentMap) -> Partitioned {
    let mut out = Partitioned::default();
    for (name, value) in args {
        if signature.accepts(&name) {
            out.accepted.insert(name, value);
        } else {
            out.rejected.insert(name, value);
        }
    }
    out
}

/// Calls the generator with only the arguments its current signature accepts.
///
/// Unsupported arguments are logged and dropped, never treated as an error.
/// Whatever the generator returns, success or failure, is passed through.
pub async fn safe_generate(
    generator: &dyn DescriptorGenerator,
    env: &GenerationEnv,
    args: ArgumentMap,
) -> Result<Value, GeneratorError> {
    let signature = generator.signature()?;

    debug!("🔍 Available parameters in {}: {:?}", signature.function, signature.names());
    debug!("🔍 Requested parameters: {:?}", args.keys().collect::<Vec<_>>());
    debug!("🔍 Has 'auto' parameter: {}", signature.accepts("auto"));

    let Partitioned { accepted, rejected } = partition(&signature, args);

    if !rejected.is_empty() {
        warn!("⚠️ Removed unsupported parameters: {}", serde_json::Value::Object(rejected));
    }

    info!("✅ Calling {} with: {}", signature.function, summarize(&accepted));
    generator.generate(env, accepted).await
}

/// Refuses to start when the generator lacks parameters the handlers rely on.
pub fn ensure_accepts(generator: &dyn DescriptorGenerator, required: &[&str]) -> Result<()> {
    let signature = generator
        .signature()
        .map_err(|e| anyhow::anyhow!("cannot introspect generator: {}", e))?;
    let missing = signature.missing(required);
    if !missing.is_empty() {
        bail!(
            "{}{} does not accept required parameters: {}",
            signature.function,
            signature,
            missing.join(", ")
        );
    }
    Ok(())
}

// ABI text can be large; keep the log line readable.
fn summarize(args: &ArgumentMap) -> String {
    const MAX_VALUE_LEN: usize = 120;

    let trimmed: ArgumentMap = args
        .iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) if s.chars().count() > MAX_VALUE_LEN => {
                    let head: String = s.chars().take(MAX_VALUE_LEN).collect();
                    Value::String(format!("{}… ({} chars)", head, s.chars().count()))
                }
                other => other.clone(),
            };
            (name.clone(), value)
        })
        .collect();
    Value::Object(trimmed).to_string()
}
