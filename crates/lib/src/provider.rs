//! Registration descriptor exposed to the host platform.
//!
//! Metadata only: the host uses it to register the `kakao` connection type
//! and find the connector entry point.

use serde::Serialize;

/// Connector registration metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProviderDescriptor {
    pub package_name: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub versions: Vec<&'static str>,
    pub connection_types: Vec<ConnectionTypeDescriptor>,
}

/// One connection type the connector handles.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConnectionTypeDescriptor {
    pub connection_type: &'static str,
    pub hook: &'static str,
}

/// Descriptor for this connector.
pub fn provider_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        package_name: "kako",
        name: "KakaoTalk",
        description: "A KakaoTalk messaging connector.",
        versions: vec![env!("CARGO_PKG_VERSION")],
        connection_types: vec![ConnectionTypeDescriptor {
            connection_type: "kakao",
            hook: "lib::channels::KakaoChannel",
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serializes_kebab_case() {
        let json = serde_json::to_value(provider_descriptor()).expect("serialize");
        assert_eq!(json["package-name"], "kako");
        assert_eq!(
            json["connection-types"][0]["connection-type"],
            "kakao"
        );
    }
}
