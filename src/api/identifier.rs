use serde::{Deserialize, Serialize};

/// Identifier a subproblem refers to, e.g. `{"type": "dns", "value": "example.org"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub _type: String,
    pub value: String,
}

impl Identifier {
    pub fn is_type_dns(&self) -> bool {
        self._type == "dns"
    }
}
