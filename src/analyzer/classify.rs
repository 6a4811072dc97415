//! Service-Type Classification
//!
//! Total function from a filename to an Azure service label. Rules are checked in
//! a fixed order and the first hit wins, so a file named both "logicapp" and
//! "policy" is a Logic App.

use std::fmt;

/// Azure service family a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceType {
    LogicApp,
    ApiManagement,
    ServiceBus,
    EventHub,
    Function,
    Bicep,
    Terraform,
    AzureConfiguration,
    Integration,
}

impl ServiceType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LogicApp => "Azure Logic App",
            Self::ApiManagement => "API Management",
            Self::ServiceBus => "Azure Service Bus",
            Self::EventHub => "Azure Event Hub",
            Self::Function => "Azure Function",
            Self::Bicep => "Bicep Infrastructure",
            Self::Terraform => "Terraform Infrastructure",
            Self::AzureConfiguration => "Azure Configuration",
            Self::Integration => "Azure Integration",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a repository path by its lowercase form
pub fn classify(path: &str) -> ServiceType {
    let lower = path.to_lowercase();
    let file_name = lower.rsplit('/').next().unwrap_or(&lower);

    if lower.contains("logicapp")
        || lower.contains("logic-app")
        || lower.contains("logic_app")
        || file_name == "workflow.json"
    {
        ServiceType::LogicApp
    } else if lower.contains("apim") || lower.contains("policy") {
        ServiceType::ApiManagement
    } else if lower.contains("servicebus") || lower.contains("service-bus") {
        ServiceType::ServiceBus
    } else if lower.contains("eventhub") || lower.contains("event-hub") {
        ServiceType::EventHub
    } else if lower.contains("function") {
        ServiceType::Function
    } else if lower.ends_with(".bicep") {
        ServiceType::Bicep
    } else if lower.ends_with(".tf") {
        ServiceType::Terraform
    } else if lower.contains("azure") {
        ServiceType::AzureConfiguration
    } else {
        ServiceType::Integration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order() {
        assert_eq!(classify("infra/logicapp-policy.json"), ServiceType::LogicApp);
        assert_eq!(classify("apim/policies/global.xml"), ServiceType::ApiManagement);
        assert_eq!(classify("infra/servicebus-orders.json"), ServiceType::ServiceBus);
        assert_eq!(classify("infra/eventhub-telemetry.json"), ServiceType::EventHub);
        assert_eq!(classify("fn/Process/function.json"), ServiceType::Function);
        assert_eq!(classify("infra/main.bicep"), ServiceType::Bicep);
        assert_eq!(classify("terraform/main.tf"), ServiceType::Terraform);
        assert_eq!(classify("azure-pipelines.yml"), ServiceType::AzureConfiguration);
        assert_eq!(classify("misc/settings.json"), ServiceType::Integration);
    }

    #[test]
    fn test_case_insensitive_substrings() {
        assert_eq!(classify("Workflows/OrderLogicApp.json"), ServiceType::LogicApp);
        assert_eq!(classify("infra/Main.Bicep"), ServiceType::Bicep);
    }

    #[test]
    fn test_workflow_json_only_by_file_name() {
        assert_eq!(classify("Orders/workflow.json"), ServiceType::LogicApp);
        assert_eq!(classify(".github/workflows/deploy.yml"), ServiceType::Integration);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ServiceType::LogicApp.to_string(), "Azure Logic App");
        assert_eq!(ServiceType::Integration.label(), "Azure Integration");
    }
}
