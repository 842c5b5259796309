//! Built-in ERC-7730 descriptor generator.
//!
//! Produces an input descriptor (`context`, `metadata`, `display`) from either
//! a supplied ABI or the verified ABI Etherscan holds for a deployed contract.
//! Two parameter profiles are published so deployments can pin the older
//! interface that predates the `auto` flag.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use ethers_core::abi::Abi;
use ethers_core::types::Address;
use ethers_core::utils::to_checksum;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use super::cache::AbiCache;
use super::chains::etherscan_chain_name;
use super::{ArgumentMap, DescriptorGenerator, GeneratorError, Parameter, Signature};
use crate::config::DEFAULT_ETHERSCAN_API_URL;
use crate::environment::GenerationEnv;

pub const SCHEMA_URL: &str = "https://eips.ethereum.org/assets/eip-7730/erc7730-v1.schema.json";

const FUNCTION_NAME: &str = "generate_descriptor";

/// Versions of the generator interface this crate knows about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GeneratorProfile {
    /// Interface without the `auto` flag.
    Legacy,
    #[default]
    Current,
}

impl GeneratorProfile {
    pub fn version(&self) -> &'static str {
        match self {
            GeneratorProfile::Legacy => "0.3.0",
            GeneratorProfile::Current => "0.4.0",
        }
    }

    pub fn signature(&self) -> Signature {
        let mut parameters = vec![
            Parameter::required("chain_id", "u64"),
            Parameter::required("contract_address", "String"),
            Parameter::optional("abi", "Option<String>", "None"),
            Parameter::optional("owner", "Option<String>", "None"),
            Parameter::optional("legal_name", "Option<String>", "None"),
            Parameter::optional("url", "Option<String>", "None"),
        ];
        if *self == GeneratorProfile::Current {
            parameters.push(Parameter::optional("auto", "bool", "false"));
        }
        Signature::new(FUNCTION_NAME, parameters)
    }
}

impl FromStr for GeneratorProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(GeneratorProfile::Legacy),
            "current" => Ok(GeneratorProfile::Current),
            other => anyhow::bail!("unknown generator profile '{}', expected 'legacy' or 'current'", other),
        }
    }
}

impl fmt::Display for GeneratorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorProfile::Legacy => f.write_str("legacy"),
            GeneratorProfile::Current => f.write_str("current"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateArgs {
    chain_id: u64,
    contract_address: String,
    #[serde(default)]
    abi: Option<String>,
    #[serde(default)]
    owner: Option<String>,
    #[serde(default)]
    legal_name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    auto: bool,
}

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    message: String,
    result: Value,
}

#[derive(Clone)]
pub struct Erc7730Generator {
    profile: GeneratorProfile,
    client: Client,
    etherscan_api_url: String,
}

impl Erc7730Generator {
    pub fn new(profile: GeneratorProfile) -> Self {
        Self {
            profile,
            client: Client::new(),
            etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
        }
    }

    pub fn with_etherscan_api_url(mut self, url: impl Into<String>) -> Self {
        self.etherscan_api_url = url.into();
        self
    }

    /// Fetches the verified ABI of `address`, going through the on-disk cache.
    async fn fetch_abi(
        &self,
        env: &GenerationEnv,
        chain_id: u64,
        address: &str,
    ) -> Result<String, GeneratorError> {
        let cache = AbiCache::new(env.etherscan_cache_dir());
        if let Some(abi) = cache.get(chain_id, address).await {
            debug!("Using cached ABI for {} on chain {}", address, chain_id);
            return Ok(abi);
        }

        info!("Fetching ABI for {} on chain {} from Etherscan", address, chain_id);
        let api_key = env
            .etherscan_api_key
            .as_ref()
            .map(|key| key.expose_secret().to_string())
            .unwrap_or_default();
        let query = [
            ("chainid", chain_id.to_string()),
            ("module", "contract".to_string()),
            ("action", "getabi".to_string()),
            ("address", address.to_string()),
            ("apikey", api_key),
        ];

        let res: EtherscanResponse = self
            .client
            .get(&self.etherscan_api_url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let result = match res.result {
            Value::String(s) => s,
            other => other.to_string(),
        };
        if res.status != "1" {
            return Err(GeneratorError::Etherscan(format!("{}: {}", res.message, result)));
        }

        if let Err(e) = cache.put(chain_id, address, &result).await {
            warn!("Failed to cache ABI for {}: {}", address, e);
        }
        Ok(result)
    }
}

#[async_trait]
impl DescriptorGenerator for Erc7730Generator {
    fn signature(&self) -> Result<Signature, GeneratorError> {
        Ok(self.profile.signature())
    }

    fn version(&self) -> Option<String> {
        Some(self.profile.version().to_string())
    }

    async fn generate(&self, env: &GenerationEnv, args: ArgumentMap) -> Result<Value, GeneratorError> {
        let signature = self.profile.signature();
        if let Some(name) = args.keys().find(|name| !signature.accepts(name)) {
            return Err(GeneratorError::UnexpectedArgument(name.clone()));
        }

        let args: GenerateArgs = serde_json::from_value(Value::Object(args))
            .map_err(|e| GeneratorError::InvalidArguments(e.to_string()))?;

        let (address, entries) = match &args.abi {
            Some(text) => (args.contract_address.clone(), parse_abi(text)?),
            None => {
                let chain = etherscan_chain_name(args.chain_id)
                    .ok_or(GeneratorError::UnsupportedChain(args.chain_id))?;
                let address = normalize_address(&args.contract_address)?;
                debug!("Looking up {} on {}", address, chain);
                let text = self.fetch_abi(env, args.chain_id, &address).await?;
                (address, parse_abi(&text)?)
            }
        };

        Ok(build_descriptor(&args, &address, entries))
    }
}

/// Checksums a hex contract address.
pub fn normalize_address(address: &str) -> Result<String, GeneratorError> {
    let trimmed = address.trim();
    if !trimmed.starts_with("0x") || trimmed.len() != 42 {
        return Err(GeneratorError::InvalidAddress(address.to_string()));
    }
    let parsed = Address::from_str(trimmed)
        .map_err(|_| GeneratorError::InvalidAddress(address.to_string()))?;
    Ok(to_checksum(&parsed, None))
}

/// Parses ABI JSON text. A compiler artifact carrying an `abi` field is
/// accepted as well as a bare array.
pub fn parse_abi(text: &str) -> Result<Vec<Value>, GeneratorError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| GeneratorError::InvalidAbi(e.to_string()))?;

    let raw = match raw {
        Value::Object(mut artifact) => match artifact.remove("abi") {
            Some(abi) => abi,
            None => {
                return Err(GeneratorError::InvalidAbi(
                    "expected a JSON array of ABI entries".to_string(),
                ))
            }
        },
        other => other,
    };
    let Value::Array(entries) = raw else {
        return Err(GeneratorError::InvalidAbi(
            "expected a JSON array of ABI entries".to_string(),
        ));
    };

    serde_json::from_value::<Abi>(Value::Array(entries.clone()))
        .map_err(|e| GeneratorError::InvalidAbi(e.to_string()))?;
    Ok(entries)
}

fn build_descriptor(args: &GenerateArgs, address: &str, entries: Vec<Value>) -> Value {
    let mut formats = Map::new();
    for entry in &entries {
        if entry.get("type").and_then(Value::as_str) != Some("function") || is_read_only(entry) {
            continue;
        }
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            continue;
        };
        let inputs = entry
            .get("inputs")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut fields = Vec::new();
        for (index, input) in inputs.iter().enumerate() {
            fields.extend(fields_for(input, index, None, args.auto));
        }
        if args.auto && entry.get("stateMutability").and_then(Value::as_str) == Some("payable") {
            fields.push(json!({ "path": "@.value", "label": "Value", "format": "amount" }));
        }

        let mut format = Map::new();
        let intent = if args.auto { humanize(name) } else { name.to_string() };
        format.insert("intent".to_string(), Value::String(intent));
        if args.auto {
            let required: Vec<Value> = fields.iter().filter_map(|f| f.get("path").cloned()).collect();
            format.insert("fields".to_string(), Value::Array(fields));
            format.insert("required".to_string(), Value::Array(required));
        } else {
            format.insert("fields".to_string(), Value::Array(fields));
        }

        formats.insert(format_key(name, &inputs), Value::Object(format));
    }

    let mut metadata = Map::new();
    if let Some(owner) = &args.owner {
        metadata.insert("owner".to_string(), json!(owner));
    }
    let mut info = Map::new();
    if let Some(legal_name) = &args.legal_name {
        info.insert("legalName".to_string(), json!(legal_name));
    }
    if let Some(url) = &args.url {
        info.insert("url".to_string(), json!(url));
    }
    if !info.is_empty() {
        metadata.insert("info".to_string(), Value::Object(info));
    }

    json!({
        "$schema": SCHEMA_URL,
        "context": {
            "contract": {
                "deployments": [{ "chainId": args.chain_id, "address": address }],
                "abi": entries,
            }
        },
        "metadata": metadata,
        "display": { "formats": formats },
    })
}

fn is_read_only(entry: &Value) -> bool {
    match entry.get("stateMutability").and_then(Value::as_str) {
        Some(mutability) => mutability == "view" || mutability == "pure",
        None => entry.get("constant").and_then(Value::as_bool).unwrap_or(false),
    }
}

/// Canonical type of an ABI parameter, expanding tuples into `(t1,t2)`.
fn canonical_type(param: &Value) -> String {
    let ty = param.get("type").and_then(Value::as_str).unwrap_or_default();
    match ty.strip_prefix("tuple") {
        Some(suffix) => {
            let components: Vec<String> = param
                .get("components")
                .and_then(Value::as_array)
                .map(|c| c.iter().map(canonical_type).collect())
                .unwrap_or_default();
            format!("({}){}", components.join(","), suffix)
        }
        None => ty.to_string(),
    }
}

/// `transfer(address to,uint256 amount)`
fn format_key(name: &str, inputs: &[Value]) -> String {
    let params: Vec<String> = inputs
        .iter()
        .map(|input| {
            let ty = canonical_type(input);
            match input.get("name").and_then(Value::as_str) {
                Some(param) if !param.is_empty() => format!("{} {}", ty, param),
                _ => ty,
            }
        })
        .collect();
    format!("{}({})", name, params.join(","))
}

fn fields_for(param: &Value, index: usize, prefix: Option<&str>, auto: bool) -> Vec<Value> {
    let name = match param.get("name").and_then(Value::as_str) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => index.to_string(),
    };
    let path = match prefix {
        Some(prefix) => format!("{}.{}", prefix, name),
        None => name.clone(),
    };
    let ty = param.get("type").and_then(Value::as_str).unwrap_or_default();

    // Arrays are described through their elements
    let (element_ty, path) = match ty.find('[') {
        Some(pos) => (&ty[..pos], format!("{}.[]", path)),
        None => (ty, path),
    };

    if element_ty == "tuple" {
        return param
            .get("components")
            .and_then(Value::as_array)
            .map(|components| {
                components
                    .iter()
                    .enumerate()
                    .flat_map(|(i, c)| fields_for(c, i, Some(path.as_str()), auto))
                    .collect()
            })
            .unwrap_or_default();
    }

    let mut field = Map::new();
    field.insert("path".to_string(), Value::String(path));
    field.insert("label".to_string(), Value::String(humanize(&name)));
    if auto {
        let (format, params) = infer_format(element_ty, &name);
        field.insert("format".to_string(), Value::String(format.to_string()));
        if let Some(params) = params {
            field.insert("params".to_string(), params);
        }
    } else {
        field.insert("format".to_string(), Value::String("raw".to_string()));
    }
    vec![Value::Object(field)]
}

fn infer_format(ty: &str, name: &str) -> (&'static str, Option<Value>) {
    let lower = name.to_lowercase();
    if ty == "address" {
        return ("addressName", Some(json!({ "sources": ["local", "ens"] })));
    }
    if ty.starts_with("uint") || ty.starts_with("int") {
        if ["deadline", "expir", "timestamp", "validuntil", "validafter"]
            .iter()
            .any(|hint| lower.contains(hint))
        {
            return ("date", Some(json!({ "encoding": "timestamp" })));
        }
        if ["amount", "value", "wad", "fee", "price", "balance"]
            .iter()
            .any(|hint| lower.contains(hint))
        {
            return ("amount", None);
        }
    }
    ("raw", None)
}

/// `amountOutMin` / `amount_out_min` -> `Amount out min`
pub fn humanize(identifier: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for c in identifier.trim_start_matches('_').chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let sentence = words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
