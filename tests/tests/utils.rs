use mock_service::prelude::*;
use std::sync::Arc;
use vacancy_load::prelude::*;

#[allow(unused)]
pub fn journey(api: &MockVacancyService, sink: &Arc<RecordingSink>) -> Journey<MockVacancyService> {
    Journey::new(
        api.clone(),
        Credential::new("zeus.tester@boranora.com", "zeuspass01!"),
        sink.clone(),
    )
}
