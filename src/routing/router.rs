//! Router — classifies an email, then resolves the recipient.

use std::sync::Arc;

use tracing::{info, warn};

use crate::classify::{
    ClassificationRequest, Department, DepartmentClassifier, GeminiClassifier,
};
use crate::config::ClassifierConfig;
use crate::routing::types::{DepartmentDirectory, MarketingRoute, RoutingDecision, RoutingPolicy};

/// Built-in mapping: support, sales and billing have their own slots;
/// everything else (marketing included) goes to `default`.
pub fn resolve_builtin(department: Department, directory: &DepartmentDirectory) -> Option<String> {
    match department {
        Department::Support => directory.support.clone(),
        Department::Sales => directory.sales.clone(),
        Department::Billing => directory.billing.clone(),
        _ => directory.default.clone(),
    }
}

/// Classifies with the wrapped classifier and resolves a recipient.
pub struct Router {
    classifier: Arc<dyn DepartmentClassifier>,
    marketing: MarketingRoute,
}

impl Router {
    pub fn new(classifier: Arc<dyn DepartmentClassifier>) -> Self {
        Self {
            classifier,
            marketing: MarketingRoute::default(),
        }
    }

    pub fn with_marketing_route(mut self, marketing: MarketingRoute) -> Self {
        self.marketing = marketing;
        self
    }

    pub fn marketing_route(&self) -> MarketingRoute {
        self.marketing
    }

    /// Resolve a recipient for an already-known department.
    ///
    /// A custom policy, when given, is authoritative.
    pub fn resolve(
        &self,
        department: Department,
        directory: &DepartmentDirectory,
        custom: Option<&dyn RoutingPolicy>,
    ) -> Option<String> {
        if let Some(policy) = custom {
            return policy.resolve(department, directory);
        }

        match (department, self.marketing) {
            (Department::Marketing, MarketingRoute::Dedicated) => directory
                .marketing
                .clone()
                .or_else(|| directory.default.clone()),
            _ => resolve_builtin(department, directory),
        }
    }

    /// Classify, resolve, and report both the department and the recipient.
    pub async fn decide(
        &self,
        request: &ClassificationRequest,
        directory: &DepartmentDirectory,
        custom: Option<&dyn RoutingPolicy>,
    ) -> RoutingDecision {
        let department = self.classifier.classify(request).await;
        let recipient = self.resolve(department, directory, custom);

        match recipient.as_deref() {
            Some(to) => info!(
                department = %department,
                custom = custom.is_some(),
                "Email routed to: {to}"
            ),
            None => warn!(
                department = %department,
                custom = custom.is_some(),
                "Email routed to no recipient"
            ),
        }

        RoutingDecision {
            department,
            recipient,
        }
    }

    /// Classify and return only the recipient address.
    pub async fn route(
        &self,
        request: &ClassificationRequest,
        directory: &DepartmentDirectory,
        custom: Option<&dyn RoutingPolicy>,
    ) -> Option<String> {
        self.decide(request, directory, custom).await.recipient
    }
}

/// Route one email using the default Gemini endpoint.
pub async fn route(
    api_key: &str,
    subject: &str,
    body: &str,
    directory: &DepartmentDirectory,
    custom: Option<&dyn RoutingPolicy>,
) -> Option<String> {
    let request = ClassificationRequest::new(api_key, subject, body);
    match GeminiClassifier::new(ClassifierConfig::default()) {
        Ok(classifier) => {
            Router::new(Arc::new(classifier))
                .route(&request, directory, custom)
                .await
        }
        Err(e) => {
            warn!(error = %e, "Could not build classifier, defaulting to support");
            match custom {
                Some(policy) => policy.resolve(Department::Support, directory),
                None => resolve_builtin(Department::Support, directory),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::error::ClassificationError;

    /// Always answers with the same department and counts calls.
    struct StubClassifier {
        department: Department,
        calls: AtomicUsize,
    }

    impl StubClassifier {
        fn new(department: Department) -> Arc<Self> {
            Arc::new(Self {
                department,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DepartmentClassifier for StubClassifier {
        async fn try_classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Result<Department, ClassificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.department)
        }
    }

    struct BrokenClassifier;

    #[async_trait]
    impl DepartmentClassifier for BrokenClassifier {
        async fn try_classify(
            &self,
            _request: &ClassificationRequest,
        ) -> Result<Department, ClassificationError> {
            Err(ClassificationError::Http { status: 500 })
        }
    }

    fn request() -> ClassificationRequest {
        ClassificationRequest::new("key", "Subject", "Body")
    }

    fn full_directory() -> DepartmentDirectory {
        DepartmentDirectory::default()
            .with_support("support@x.com")
            .with_sales("sales@x.com")
            .with_billing("billing@x.com")
            .with_marketing("m@x.com")
            .with_default("d@x.com")
    }

    #[test]
    fn builtin_mapping() {
        let directory = full_directory();
        assert_eq!(
            resolve_builtin(Department::Support, &directory).as_deref(),
            Some("support@x.com")
        );
        assert_eq!(
            resolve_builtin(Department::Sales, &directory).as_deref(),
            Some("sales@x.com")
        );
        assert_eq!(
            resolve_builtin(Department::Billing, &directory).as_deref(),
            Some("billing@x.com")
        );
        assert_eq!(
            resolve_builtin(Department::Marketing, &directory).as_deref(),
            Some("d@x.com")
        );
    }

    #[test]
    fn missing_slot_resolves_to_none() {
        let directory = DepartmentDirectory::default().with_default("d@x.com");
        assert_eq!(resolve_builtin(Department::Billing, &directory), None);
        assert_eq!(resolve_builtin(Department::Marketing, &DepartmentDirectory::default()), None);
    }

    #[tokio::test]
    async fn sales_routes_to_sales_address() {
        let router = Router::new(StubClassifier::new(Department::Sales));
        let directory = DepartmentDirectory::default()
            .with_sales("a@x.com")
            .with_default("d@x.com");

        let recipient = router.route(&request(), &directory, None).await;
        assert_eq!(recipient.as_deref(), Some("a@x.com"));
    }

    #[tokio::test]
    async fn marketing_falls_through_to_default() {
        let router = Router::new(StubClassifier::new(Department::Marketing));
        let directory = DepartmentDirectory::default()
            .with_marketing("m@x.com")
            .with_default("d@x.com");

        let decision = router.decide(&request(), &directory, None).await;
        assert_eq!(decision.department, Department::Marketing);
        assert_eq!(decision.recipient.as_deref(), Some("d@x.com"));
    }

    #[tokio::test]
    async fn dedicated_marketing_uses_marketing_slot() {
        let router = Router::new(StubClassifier::new(Department::Marketing))
            .with_marketing_route(MarketingRoute::Dedicated);

        let with_slot = DepartmentDirectory::default()
            .with_marketing("m@x.com")
            .with_default("d@x.com");
        assert_eq!(
            router.route(&request(), &with_slot, None).await.as_deref(),
            Some("m@x.com")
        );

        let without_slot = DepartmentDirectory::default().with_default("d@x.com");
        assert_eq!(
            router.route(&request(), &without_slot, None).await.as_deref(),
            Some("d@x.com")
        );
    }

    #[tokio::test]
    async fn custom_policy_overrides_builtin_mapping() {
        let router = Router::new(StubClassifier::new(Department::Sales));
        let directory = full_directory();
        let policy = |department: Department, _: &DepartmentDirectory| {
            Some(format!("{department}-team@custom.io"))
        };

        let recipient = router.route(&request(), &directory, Some(&policy)).await;
        assert_eq!(recipient.as_deref(), Some("sales-team@custom.io"));
    }

    #[tokio::test]
    async fn custom_policy_result_is_verbatim_even_when_none() {
        let router = Router::new(StubClassifier::new(Department::Support));
        let policy = |_: Department, _: &DepartmentDirectory| -> Option<String> { None };

        let recipient = router
            .route(&request(), &full_directory(), Some(&policy))
            .await;
        assert_eq!(recipient, None);
    }

    #[tokio::test]
    async fn classifier_failure_routes_to_support() {
        let router = Router::new(Arc::new(BrokenClassifier));
        let decision = router.decide(&request(), &full_directory(), None).await;
        assert_eq!(decision.department, Department::Support);
        assert_eq!(decision.recipient.as_deref(), Some("support@x.com"));
    }

    #[tokio::test]
    async fn classifier_called_once_per_route() {
        let stub = StubClassifier::new(Department::Billing);
        let router = Router::new(stub.clone());
        router.route(&request(), &full_directory(), None).await;
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }
}
