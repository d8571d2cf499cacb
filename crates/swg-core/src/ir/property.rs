use serde::Serialize;

/// One normalized field of a resolved type, parameter or response.
///
/// `type_name` is a placeholder (`T`), a primitive token (`string`, `integer`,
/// `Array<Pet>` …) or the name of a definition; never a raw `$ref` string.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualProperty {
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    pub description: String,

    pub required: bool,

    pub enum_option: Vec<serde_json::Value>,

    /// Base name of the referenced definition, if the type points at one.
    #[serde(rename = "ref")]
    pub ref_name: String,

    pub format: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Children of an inline object field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<VirtualProperty>>,
}

impl VirtualProperty {
    pub fn is_enum(&self) -> bool {
        !self.enum_option.is_empty()
    }
}
