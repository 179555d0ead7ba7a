use std::fmt;
use std::time::Duration;

use log::{info, warn};
use tokio::sync::oneshot::error::TryRecvError;

use super::condition::ConditionSelector;
use crate::error::SubmitError;
use crate::location::{LocationError, LocationProvider, PendingPosition, Permission, Position};
use crate::state::data::NewSurveyRecord;
use crate::state::store::RecordStore;

/// Input fields that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    SiteName,
    Date,
    Description,
    Observations,
    TerrainType,
    Condition,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::SiteName => "site name",
            FormField::Date => "date",
            FormField::Description => "description",
            FormField::Observations => "observations",
            FormField::TerrainType => "terrain type",
            FormField::Condition => "condition",
        };
        f.write_str(name)
    }
}

/// Raw values of the entry form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub site_name: String,
    pub date: String,
    /// Filled by a successful location capture, empty otherwise
    pub coordinates: String,
    pub description: String,
    pub terrain_type: String,
    pub observations: String,
}

/// User-visible result of a location request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationNotice {
    /// Coordinates were captured into the form
    Captured(String),
    /// No answer yet; it may never come
    Pending,
    Unavailable,
    Failed(String),
    PermissionDenied,
    /// No request is outstanding
    NotRequested,
}

/// Check the form and build the record to insert.
///
/// Fields are checked in a fixed order and only the first empty one is
/// reported.
pub fn validate(
    form: &EntryForm,
    condition: &ConditionSelector,
) -> Result<NewSurveyRecord, SubmitError> {
    let required = [
        (FormField::SiteName, &form.site_name, "site name is required"),
        (FormField::Date, &form.date, "survey date is required"),
        (FormField::Description, &form.description, "description is required"),
        (FormField::Observations, &form.observations, "observations are required"),
        (FormField::TerrainType, &form.terrain_type, "terrain type is required"),
    ];

    for (field, value, message) in required {
        if value.is_empty() {
            return Err(SubmitError::Validation { field, message });
        }
    }

    let resolved = condition.resolve();
    if resolved.as_str().is_empty() {
        return Err(SubmitError::Validation {
            field: FormField::Condition,
            message: "site condition is required",
        });
    }

    Ok(NewSurveyRecord {
        site_name: form.site_name.clone(),
        date: form.date.clone(),
        coordinates: form.coordinates.clone(),
        description: form.description.clone(),
        terrain_type: form.terrain_type.clone(),
        observations: form.observations.clone(),
        condition: resolved,
    })
}

/// Drives the data-entry session: form state, location capture and saving.
pub struct EntryController<'a, P: LocationProvider> {
    store: &'a RecordStore,
    provider: P,
    permission: Permission,
    form: EntryForm,
    condition: ConditionSelector,
    pending: Option<PendingPosition>,
}

impl<'a, P: LocationProvider> EntryController<'a, P> {
    pub fn new(store: &'a RecordStore, provider: P, permission: Permission) -> Self {
        Self {
            store,
            provider,
            permission,
            form: EntryForm::default(),
            condition: ConditionSelector::new(),
            pending: None,
        }
    }

    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    pub fn condition(&self) -> &ConditionSelector {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut ConditionSelector {
        &mut self.condition
    }

    /// Permission changes arrive from the platform at any time
    pub fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
    }

    /// Ask the provider for the last known position without waiting for it.
    ///
    /// A denied permission skips capture entirely. A newer request replaces
    /// any outstanding one.
    pub fn request_location(&mut self) -> LocationNotice {
        if self.permission == Permission::Denied {
            warn!("🚫 Location permission denied; capture skipped");
            self.pending = None;
            return LocationNotice::PermissionDenied;
        }

        self.pending = Some(self.provider.last_known_position());
        LocationNotice::Pending
    }

    /// Non-blocking check on the outstanding location request
    pub fn poll_location(&mut self) -> LocationNotice {
        let Some(rx) = self.pending.as_mut() else {
            return LocationNotice::NotRequested;
        };

        match rx.try_recv() {
            Ok(answer) => {
                self.pending = None;
                self.apply_location(answer)
            }
            Err(TryRecvError::Empty) => LocationNotice::Pending,
            Err(TryRecvError::Closed) => {
                self.pending = None;
                warn!("📍 Location provider went away without answering");
                LocationNotice::Unavailable
            }
        }
    }

    /// Wait up to `timeout` for the outstanding request.
    ///
    /// On timeout the request stays outstanding and `Pending` is returned.
    pub async fn wait_for_location(&mut self, timeout: Duration) -> LocationNotice {
        let Some(rx) = self.pending.as_mut() else {
            return LocationNotice::NotRequested;
        };

        let outcome = tokio::time::timeout(timeout, rx).await;
        match outcome {
            Ok(Ok(answer)) => {
                self.pending = None;
                self.apply_location(answer)
            }
            Ok(Err(_)) => {
                self.pending = None;
                warn!("📍 Location provider went away without answering");
                LocationNotice::Unavailable
            }
            Err(_) => LocationNotice::Pending,
        }
    }

    fn apply_location(&mut self, answer: Result<Position, LocationError>) -> LocationNotice {
        match answer {
            Ok(position) => {
                self.form.coordinates = position.to_coordinates();
                info!("📍 Captured position {}", position);
                LocationNotice::Captured(self.form.coordinates.clone())
            }
            Err(LocationError::Unavailable) => {
                warn!("📍 No location fix available");
                LocationNotice::Unavailable
            }
            Err(LocationError::Failed(reason)) => {
                warn!("📍 Location request failed: {}", reason);
                LocationNotice::Failed(reason)
            }
        }
    }

    /// Validate the current form and save it.
    ///
    /// Returns the store-assigned id. Nothing is retried on failure.
    pub fn submit(&self) -> Result<i64, SubmitError> {
        let record = validate(&self.form, &self.condition).map_err(|e| {
            warn!("⚠️  Entry rejected: {}", e);
            e
        })?;

        let id = self.store.insert(&record).map_err(|e| {
            warn!("❌ Failed to save entry: {}", e);
            e
        })?;
        Ok(id)
    }

    /// End the session, dropping any outstanding location request
    pub fn dispose(self) -> EntryForm {
        if self.pending.is_some() {
            info!("📍 Discarding unanswered location request");
        }
        self.form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::condition::ConditionFlag;
    use crate::location::StaticLocationProvider;
    use crate::state::data::{Condition, SurveyRecord};
    use std::cell::RefCell;
    use tokio::sync::oneshot;

    /// Holds on to every request and never answers
    #[derive(Default)]
    struct SilentProvider {
        senders: RefCell<Vec<oneshot::Sender<Result<Position, LocationError>>>>,
    }

    impl LocationProvider for SilentProvider {
        fn last_known_position(&self) -> PendingPosition {
            let (tx, rx) = oneshot::channel();
            self.senders.borrow_mut().push(tx);
            rx
        }
    }

    /// Drops the sender right away
    struct DroppingProvider;

    impl LocationProvider for DroppingProvider {
        fn last_known_position(&self) -> PendingPosition {
            let (_tx, rx) = oneshot::channel();
            rx
        }
    }

    struct FailingProvider;

    impl LocationProvider for FailingProvider {
        fn last_known_position(&self) -> PendingPosition {
            let (tx, rx) = oneshot::channel();
            let _ = tx.send(Err(LocationError::Failed("GPS off".to_string())));
            rx
        }
    }

    fn fill(form: &mut EntryForm) {
        form.site_name = "Quarry A".to_string();
        form.date = "2024-05-01".to_string();
        form.description = "Open pit".to_string();
        form.terrain_type = "Rocky".to_string();
        form.observations = "Dust visible".to_string();
    }

    fn filled_form() -> EntryForm {
        let mut form = EntryForm::default();
        fill(&mut form);
        form
    }

    fn rejected_field(result: Result<i64, SubmitError>) -> FormField {
        match result {
            Err(SubmitError::Validation { field, .. }) => field,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_reports_first_empty_field() {
        let condition = ConditionSelector::new();
        let cases: [(fn(&mut EntryForm), FormField); 5] = [
            (|f: &mut EntryForm| f.site_name.clear(), FormField::SiteName),
            (|f: &mut EntryForm| f.date.clear(), FormField::Date),
            (|f: &mut EntryForm| f.description.clear(), FormField::Description),
            (|f: &mut EntryForm| f.observations.clear(), FormField::Observations),
            (|f: &mut EntryForm| f.terrain_type.clear(), FormField::TerrainType),
        ];

        for (clear, expected) in cases {
            let mut form = filled_form();
            clear(&mut form);
            match validate(&form, &condition) {
                Err(SubmitError::Validation { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected {:?} to be rejected, got {:?}", expected, other),
            }
        }
    }

    #[test]
    fn test_validation_order_site_name_before_date() {
        let mut form = filled_form();
        form.site_name.clear();
        form.date.clear();
        form.terrain_type.clear();

        match validate(&form, &ConditionSelector::new()) {
            Err(SubmitError::Validation { field, message }) => {
                assert_eq!(field, FormField::SiteName);
                assert_eq!(message, "site name is required");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_site_name_never_reaches_store() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller =
            EntryController::new(&store, StaticLocationProvider::default(), Permission::Granted);
        fill(controller.form_mut());
        controller.form_mut().site_name.clear();

        assert_eq!(rejected_field(controller.submit()), FormField::SiteName);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_submit_without_condition_saves_unspecified() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller =
            EntryController::new(&store, StaticLocationProvider::default(), Permission::Granted);
        fill(controller.form_mut());

        let id = controller.submit().unwrap();

        let records = store.fetch_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].condition, Condition::Unspecified);
        assert_eq!(records[0].coordinates, "");
    }

    #[test]
    fn test_submit_uses_last_selected_condition() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller =
            EntryController::new(&store, StaticLocationProvider::default(), Permission::Granted);
        fill(controller.form_mut());
        controller.condition_mut().toggle(ConditionFlag::Good);
        controller.condition_mut().toggle(ConditionFlag::Damaged);

        controller.submit().unwrap();

        assert_eq!(store.fetch_all().unwrap()[0].condition, Condition::Damaged);
    }

    #[test]
    fn test_each_submit_gets_a_fresh_id() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller =
            EntryController::new(&store, StaticLocationProvider::default(), Permission::Granted);
        fill(controller.form_mut());

        let first = controller.submit().unwrap();
        let second = controller.submit().unwrap();

        assert_ne!(first, second);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_captured_location_is_saved_with_record() {
        let store = RecordStore::open_in_memory().unwrap();
        let provider = StaticLocationProvider::new(Some(Position::new(34.02, -6.83)));
        let mut controller = EntryController::new(&store, provider, Permission::Granted);
        fill(controller.form_mut());
        controller.condition_mut().set(ConditionFlag::Good, true);

        assert_eq!(controller.request_location(), LocationNotice::Pending);
        let notice = controller.wait_for_location(Duration::from_secs(1)).await;
        assert_eq!(
            notice,
            LocationNotice::Captured("Latitude: 34.02\nLongitude: -6.83".to_string())
        );

        let id = controller.submit().unwrap();
        assert_eq!(id, 1);

        let expected = SurveyRecord {
            id: 1,
            site_name: "Quarry A".to_string(),
            date: "2024-05-01".to_string(),
            coordinates: "Latitude: 34.02\nLongitude: -6.83".to_string(),
            description: "Open pit".to_string(),
            terrain_type: "Rocky".to_string(),
            observations: "Dust visible".to_string(),
            condition: Condition::GoodCondition,
        };
        assert_eq!(store.fetch_all().unwrap(), vec![expected]);
    }

    #[test]
    fn test_poll_picks_up_immediate_answer() {
        let store = RecordStore::open_in_memory().unwrap();
        let provider = StaticLocationProvider::new(Some(Position::new(1.0, 2.0)));
        let mut controller = EntryController::new(&store, provider, Permission::Granted);

        assert_eq!(controller.poll_location(), LocationNotice::NotRequested);
        controller.request_location();
        assert_eq!(
            controller.poll_location(),
            LocationNotice::Captured("Latitude: 1.0\nLongitude: 2.0".to_string())
        );
        assert_eq!(controller.poll_location(), LocationNotice::NotRequested);
    }

    #[test]
    fn test_permission_denied_still_saves_without_coordinates() {
        let store = RecordStore::open_in_memory().unwrap();
        let provider = StaticLocationProvider::new(Some(Position::new(1.0, 2.0)));
        let mut controller = EntryController::new(&store, provider, Permission::Denied);
        fill(controller.form_mut());

        assert_eq!(controller.request_location(), LocationNotice::PermissionDenied);
        assert_eq!(controller.poll_location(), LocationNotice::NotRequested);

        controller.submit().unwrap();
        assert_eq!(store.fetch_all().unwrap()[0].coordinates, "");
    }

    #[test]
    fn test_granting_permission_later_allows_capture() {
        let store = RecordStore::open_in_memory().unwrap();
        let provider = StaticLocationProvider::new(Some(Position::new(1.0, 2.0)));
        let mut controller = EntryController::new(&store, provider, Permission::Denied);

        controller.set_permission(Permission::Granted);
        controller.request_location();

        assert!(matches!(
            controller.poll_location(),
            LocationNotice::Captured(_)
        ));
    }

    #[test]
    fn test_unavailable_fix_leaves_coordinates_empty() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller =
            EntryController::new(&store, StaticLocationProvider::default(), Permission::Granted);
        fill(controller.form_mut());

        controller.request_location();

        assert_eq!(controller.poll_location(), LocationNotice::Unavailable);
        assert_eq!(controller.form().coordinates, "");

        // The entry is still saved, with no coordinates
        let id = controller.submit().unwrap();
        let saved = store.fetch_all().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, id);
        assert_eq!(saved[0].site_name, "Quarry A");
        assert_eq!(saved[0].coordinates, "");
    }

    #[test]
    fn test_provider_failure_is_reported() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller = EntryController::new(&store, FailingProvider, Permission::Granted);
        fill(controller.form_mut());

        controller.request_location();

        assert_eq!(
            controller.poll_location(),
            LocationNotice::Failed("GPS off".to_string())
        );

        controller.submit().unwrap();
        let saved = store.fetch_all().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].coordinates, "");
    }

    #[tokio::test]
    async fn test_dropped_request_counts_as_unavailable() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller = EntryController::new(&store, DroppingProvider, Permission::Granted);
        fill(controller.form_mut());

        controller.request_location();

        assert_eq!(
            controller.wait_for_location(Duration::from_millis(50)).await,
            LocationNotice::Unavailable
        );

        controller.submit().unwrap();
        assert_eq!(store.fetch_all().unwrap()[0].coordinates, "");
    }

    #[tokio::test]
    async fn test_silent_provider_does_not_block() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut controller =
            EntryController::new(&store, SilentProvider::default(), Permission::Granted);
        fill(controller.form_mut());

        controller.request_location();
        assert_eq!(controller.poll_location(), LocationNotice::Pending);
        assert_eq!(
            controller.wait_for_location(Duration::from_millis(20)).await,
            LocationNotice::Pending
        );

        // Saving still works while the request is outstanding
        controller.submit().unwrap();
        let form = controller.dispose();
        assert_eq!(form.coordinates, "");
    }
}
