use std::fmt;

/// One accepted keyword parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
    /// Rendered default value; `None` marks the parameter as mandatory.
    pub default: Option<String>,
}

impl Parameter {
    pub fn required(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            default: None,
        }
    }

    pub fn optional(name: &str, ty: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            default: Some(default.to_string()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// The parameter list of a generator entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub function: String,
    pub parameters: Vec<Parameter>,
}

impl Signature {
    pub fn new(function: &str, parameters: Vec<Parameter>) -> Self {
        Self {
            function: function.to_string(),
            parameters,
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p.name == name)
    }

    /// Names from `wanted` that this signature does not accept.
    pub fn missing<'a>(&self, wanted: &[&'a str]) -> Vec<&'a str> {
        wanted
            .iter()
            .copied()
            .filter(|name| !self.accepts(name))
            .collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| match &p.default {
                Some(default) => format!("{}: {} = {}", p.name, p.ty, default),
                None => format!("{}: {}", p.name, p.ty),
            })
            .collect();
        write!(f, "({})", params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Signature {
        Signature::new(
            "generate_descriptor",
            vec![
                Parameter::required("chain_id", "u64"),
                Parameter::optional("abi", "Option<String>", "None"),
                Parameter::optional("auto", "bool", "false"),
            ],
        )
    }

    #[test]
    fn test_display_renders_defaults() {
        assert_eq!(
            sample().to_string(),
            "(chain_id: u64, abi: Option<String> = None, auto: bool = false)"
        );
    }

    #[test]
    fn test_accepts_and_missing() {
        let sig = sample();
        assert!(sig.accepts("auto"));
        assert!(!sig.accepts("owner"));
        assert_eq!(sig.missing(&["chain_id", "contract_address"]), vec!["contract_address"]);
        assert!(sig.parameters[0].is_required());
        assert!(!sig.parameters[2].is_required());
    }
}
