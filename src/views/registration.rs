//! Registration / profile-update form controller

use serde_json::{Map, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{emit_to, MountId, ViewContext, ViewEvent};
use crate::api::{ApiError, Endpoint, WriteKind, WriteOutcome};
use crate::models::{Identity, Mode, NavTarget};
use crate::profile::{FieldDescriptor, FieldName, FieldSetSpec, Profile};

/// What became of a `/getDatos` result handed to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLoad {
    /// The fetched profile replaced the field set
    Applied,
    /// Meant for another mount, or the form is gone; nothing changed
    Stale,
    /// The fetch or its decoding failed; the field set is unchanged
    Failed(String),
}

impl ProfileLoad {
    pub fn is_applied(&self) -> bool {
        matches!(self, ProfileLoad::Applied)
    }
}

/// Form for registering a rider or driver, or updating their profile.
///
/// In `Update` mode the stored profile is requested on mount and replaces
/// the local field set when it arrives. Submitting starts the write in the
/// background and navigates right away, whatever the write's outcome.
pub struct RegistrationForm {
    identity: Identity,
    mode: Mode,
    layout: FieldSetSpec,
    profile: Profile,
    mount: MountId,
    mounted: bool,
    ctx: ViewContext,
}

impl RegistrationForm {
    pub fn mount(identity: Identity, mode: Mode, ctx: ViewContext) -> Self {
        let mut profile = Profile::empty(identity.role);
        if mode == Mode::Update {
            profile.personal_mut().phone = identity.phone_number.clone();
        }

        let form = Self {
            layout: FieldSetSpec::for_variant(identity.role, mode),
            identity,
            mode,
            profile,
            mount: MountId::next(),
            mounted: true,
            ctx,
        };

        info!(
            "Mounted {} form for {} ({})",
            form.mode.as_str(),
            form.identity.role,
            form.mount
        );

        if form.mode == Mode::Update {
            form.request_profile();
        }
        form
    }

    fn request_profile(&self) {
        let client = self.ctx.client.clone();
        let events = self.ctx.sender();
        let identity = self.identity.clone();
        let mount = self.mount;

        tokio::spawn(async move {
            let result = client.fetch_profile(&identity).await;
            emit_to(&events, ViewEvent::ProfileLoaded { mount, result });
        });
    }

    /// Merge a `/getDatos` result into the field set
    pub fn on_profile_loaded(
        &mut self,
        mount: MountId,
        result: Result<Map<String, Value>, ApiError>,
    ) -> ProfileLoad {
        if !self.accepts(mount) {
            debug!("Discarding profile for {} (current {})", mount, self.mount);
            return ProfileLoad::Stale;
        }

        let fetched = match result {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Could not load profile for {}: {}", self.identity.phone_number, e);
                return ProfileLoad::Failed(e.to_string());
            }
        };

        match Profile::from_fetched(self.identity.role, fetched) {
            Ok(mut profile) => {
                if profile.personal().phone.is_empty() {
                    profile.personal_mut().phone = self.identity.phone_number.clone();
                }
                self.profile = profile;
                info!("Profile loaded for {}", self.identity.phone_number);
                ProfileLoad::Applied
            }
            Err(e) => {
                warn!("Profile response has an unexpected shape: {}", e);
                ProfileLoad::Failed(ApiError::decode(Endpoint::FetchProfile, e).to_string())
            }
        }
    }

    fn accepts(&self, mount: MountId) -> bool {
        self.mounted && mount == self.mount
    }

    /// Apply one edit by input name.
    ///
    /// Unknown names, fields this variant does not show, read-only fields and
    /// values outside a dropdown's options are ignored. Returns whether the
    /// field set changed.
    pub fn update_field(&mut self, name: &str, value: &str) -> bool {
        match FieldName::from_input_name(name) {
            Some(field) => self.edit(field, value),
            None => {
                debug!("Ignoring edit of unknown field '{}'", name);
                false
            }
        }
    }

    /// Typed form of [`update_field`](Self::update_field)
    pub fn edit(&mut self, field: FieldName, value: &str) -> bool {
        let Some(descriptor) = self.layout.descriptor(field) else {
            debug!("Ignoring edit of {}: not part of this form", field);
            return false;
        };
        if !descriptor.editable {
            debug!("Ignoring edit of read-only field {}", field);
            return false;
        }
        if !descriptor.kind.accepts(value) {
            debug!("Ignoring '{}' for {}: not one of its options", value, field);
            return false;
        }
        if self.profile.value(field).as_deref() == Some(value) {
            return false;
        }
        self.profile.set(field, value)
    }

    /// Send the full field set and navigate without waiting for the reply.
    ///
    /// The returned handle resolves once the write has finished and its
    /// outcome has been reported as [`ViewEvent::WriteFinished`].
    pub fn submit(&self) -> JoinHandle<()> {
        let kind = self.write_kind();
        let target = self.exit_target();
        let body = self.profile.to_request_body();
        let client = self.ctx.client.clone();
        let events = self.ctx.sender();

        info!("Submitting {} to {}", self.mode.as_str(), kind.endpoint());

        let write = tokio::spawn(async move {
            let outcome = match body {
                Ok(body) => client.write_profile(kind, &body).await,
                Err(e) => WriteOutcome::Failed(ApiError::Encode(e)),
            };
            emit_to(&events, ViewEvent::WriteFinished { kind, outcome });
        });

        self.ctx.navigate(target);
        write
    }

    /// Leave the form without writing anything
    pub fn cancel(&self) {
        self.ctx.navigate(self.exit_target());
    }

    /// Stop accepting background results
    pub fn unmount(&mut self) {
        if self.mounted {
            debug!("Unmounting registration form ({})", self.mount);
        }
        self.mounted = false;
    }

    fn write_kind(&self) -> WriteKind {
        match self.mode {
            Mode::Create => WriteKind::Insert,
            Mode::Update => WriteKind::Update,
        }
    }

    fn exit_target(&self) -> NavTarget {
        match self.mode {
            Mode::Create => NavTarget::Login,
            Mode::Update => NavTarget::menu_for(self.identity.role),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn layout(&self) -> &FieldSetSpec {
        &self.layout
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Descriptors in render order
    pub fn descriptors(&self) -> Vec<&FieldDescriptor> {
        self.layout.fields().collect()
    }

    /// Stored value of a rendered field, empty for fields this form lacks
    pub fn value(&self, field: FieldName) -> String {
        self.profile.value(field).unwrap_or_default()
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Registrar Usuario",
            Mode::Update => "Actualizar Datos",
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            Mode::Create => format!("Registro de {}", self.identity.role),
            Mode::Update => format!("Actualizar datos de {}", self.identity.role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::views::test_support::memory_context;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_create_starts_empty_without_fetch() {
        let (ctx, transport, _rx) = memory_context();
        let form = RegistrationForm::mount(Identity::new("", Role::Driver), Mode::Create, ctx);
        tokio::task::yield_now().await;

        assert!(transport.sent().await.is_empty());
        assert_eq!(form.value(FieldName::Phone), "");
        assert_eq!(form.value(FieldName::Gender), "Select");
        assert_eq!(form.value(FieldName::Trunk), "Select2");
        assert_eq!(form.value(FieldName::Year), "Select1");
        assert_eq!(form.submit_label(), "Registrar Usuario");
    }

    #[tokio::test]
    async fn test_update_fetches_and_replaces_state() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(
                Endpoint::FetchProfile,
                json!([{
                    "cellphone": "3150001111",
                    "password": "secreto",
                    "nombre": "Luis",
                    "apellido": "Perez",
                    "genero": "M",
                    "placa": "WEA753"
                }]),
            )
            .await;

        let identity = Identity::new("3150001111", Role::Driver);
        let mut form = RegistrationForm::mount(identity, Mode::Update, ctx);
        assert_eq!(form.value(FieldName::FirstName), "");

        let Some(ViewEvent::ProfileLoaded { mount, result }) = rx.recv().await else {
            panic!("expected profile load event");
        };
        assert_eq!(form.on_profile_loaded(mount, result), ProfileLoad::Applied);

        assert_eq!(form.value(FieldName::FirstName), "Luis");
        assert_eq!(form.value(FieldName::Vehicle), "WEA753");
        let (endpoint, body) = transport.last_sent().await.unwrap();
        assert_eq!(endpoint, Endpoint::FetchProfile);
        assert_eq!(body, json!({"cellphone": "3150001111", "user": "Conductor"}));
    }

    #[tokio::test]
    async fn test_edit_changes_only_that_field() {
        let (ctx, _transport, _rx) = memory_context();
        let mut form = RegistrationForm::mount(Identity::new("", Role::Rider), Mode::Create, ctx);
        form.update_field("nombre", "Ana");
        form.update_field("direccion", "Calle 10");
        let before = form.profile().clone();

        assert!(form.update_field("apellido", "Gomez"));
        for field in form.layout().field_names() {
            if field != FieldName::LastName {
                assert_eq!(form.profile().value(field), before.value(field));
            }
        }
        assert_eq!(form.value(FieldName::LastName), "Gomez");

        let after_first = form.profile().clone();
        assert!(!form.update_field("apellido", "Gomez"));
        assert_eq!(form.profile(), &after_first);
    }

    #[tokio::test]
    async fn test_unknown_and_foreign_fields_are_ignored() {
        let (ctx, _transport, _rx) = memory_context();
        let mut form = RegistrationForm::mount(Identity::new("", Role::Rider), Mode::Create, ctx);
        let before = form.profile().clone();

        assert!(!form.update_field("edad", "30"));
        assert!(!form.update_field("placa", "ABC123"));
        assert!(!form.update_field("genero", "Z"));
        assert_eq!(form.profile(), &before);
    }

    #[tokio::test]
    async fn test_phone_is_read_only_in_update() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::FetchProfile, json!([{"cellphone": "3000000001", "nombre": "Eva"}]))
            .await;
        let mut form =
            RegistrationForm::mount(Identity::new("3000000001", Role::Rider), Mode::Update, ctx);

        // before the fetch resolves
        assert!(!form.update_field("cellphone", "3999999999"));
        assert_eq!(form.value(FieldName::Phone), "3000000001");

        let Some(ViewEvent::ProfileLoaded { mount, result }) = rx.recv().await else {
            panic!("expected profile load event");
        };
        form.on_profile_loaded(mount, result);

        // and after
        assert!(!form.update_field("cellphone", "3999999999"));
        assert_eq!(form.value(FieldName::Phone), "3000000001");
        assert!(form.update_field("nombre", "Eva Maria"));
    }

    #[tokio::test]
    async fn test_create_rider_submit_navigates_to_login_even_when_rejected() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::InsertUser, json!([{"bool": false}]))
            .await;
        let mut form = RegistrationForm::mount(Identity::new("", Role::Rider), Mode::Create, ctx);
        form.update_field("cellphone", "3201234567");
        form.update_field("tarjeta", "4111-1111");

        let write = form.submit();

        let Some(ViewEvent::Navigate(target)) = rx.recv().await else {
            panic!("navigation should be dispatched first");
        };
        assert_eq!(target, NavTarget::Login);
        assert_eq!(target.as_str(), "Login");

        write.await.unwrap();
        let Some(ViewEvent::WriteFinished { kind, outcome }) = rx.recv().await else {
            panic!("expected write outcome");
        };
        assert_eq!(kind, WriteKind::Insert);
        assert!(matches!(outcome, WriteOutcome::Rejected));

        let (endpoint, body) = transport.last_sent().await.unwrap();
        assert_eq!(endpoint, Endpoint::InsertUser);
        assert_eq!(body["cellphone"], "3201234567");
        assert_eq!(body["tarjeta"], "4111-1111");
        assert_eq!(body["user"], "Usuario");
    }

    #[tokio::test]
    async fn test_update_driver_submit_goes_to_driver_menu() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::UpdateProfile, json!([{"bool": true}]))
            .await;
        let form =
            RegistrationForm::mount(Identity::new("3110000000", Role::Driver), Mode::Update, ctx);

        let write = form.submit();
        let Some(ViewEvent::Navigate(target)) = rx.recv().await else {
            panic!("expected navigation");
        };
        assert_eq!(target.as_str(), "Menu-Conductor");

        write.await.unwrap();
        let sent = transport.sent().await;
        assert!(sent
            .iter()
            .any(|(endpoint, _)| *endpoint == Endpoint::UpdateProfile));
    }

    #[tokio::test]
    async fn test_submit_navigates_when_transport_fails() {
        let (ctx, transport, mut rx) = memory_context();
        transport.queue_failure(Endpoint::InsertUser, "connection refused").await;
        let form = RegistrationForm::mount(Identity::new("", Role::Driver), Mode::Create, ctx);

        let write = form.submit();
        assert!(matches!(rx.recv().await, Some(ViewEvent::Navigate(NavTarget::Login))));
        write.await.unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(ViewEvent::WriteFinished {
                outcome: WriteOutcome::Failed(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_cancel_never_touches_network() {
        let (ctx, transport, mut rx) = memory_context();
        let create = RegistrationForm::mount(Identity::new("", Role::Driver), Mode::Create, ctx.clone());
        create.cancel();
        assert!(matches!(rx.recv().await, Some(ViewEvent::Navigate(NavTarget::Login))));

        transport.queue_response(Endpoint::FetchProfile, json!([{}])).await;
        let update = RegistrationForm::mount(Identity::new("1", Role::Rider), Mode::Update, ctx);
        update.cancel();

        let mut saw_menu = false;
        while let Ok(event) = rx.try_recv() {
            if let ViewEvent::Navigate(target) = event {
                assert_eq!(target, NavTarget::Menu(Role::Rider));
                saw_menu = true;
            }
        }
        assert!(saw_menu);
        tokio::task::yield_now().await;
        let sent = transport.sent().await;
        assert!(sent.iter().all(|(endpoint, _)| *endpoint == Endpoint::FetchProfile));
    }

    #[tokio::test]
    async fn test_profile_after_unmount_is_discarded() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::FetchProfile, json!([{"nombre": "Tarde"}]))
            .await;
        let mut form = RegistrationForm::mount(Identity::new("1", Role::Rider), Mode::Update, ctx);
        form.unmount();

        let Some(ViewEvent::ProfileLoaded { mount, result }) = rx.recv().await else {
            panic!("expected profile load event");
        };
        assert_eq!(form.on_profile_loaded(mount, result), ProfileLoad::Stale);
        assert_eq!(form.value(FieldName::FirstName), "");
    }

    #[tokio::test]
    async fn test_profile_for_other_mount_is_discarded() {
        let (ctx, _transport, _rx) = memory_context();
        let mut form = RegistrationForm::mount(Identity::new("1", Role::Rider), Mode::Create, ctx);
        let stale = MountId::next();
        let outcome = form.on_profile_loaded(stale, Ok(as_map(json!({"nombre": "Otro"}))));
        assert_eq!(outcome, ProfileLoad::Stale);
        assert_eq!(form.value(FieldName::FirstName), "");
    }

    #[tokio::test]
    async fn test_unreadable_profile_is_reported_and_keeps_fields() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(Endpoint::FetchProfile, json!([{"nombre": {"primero": "Ana"}}]))
            .await;
        let mut form =
            RegistrationForm::mount(Identity::new("3001234567", Role::Rider), Mode::Update, ctx);

        let Some(ViewEvent::ProfileLoaded { mount, result }) = rx.recv().await else {
            panic!("expected profile load event");
        };
        assert!(matches!(form.on_profile_loaded(mount, result), ProfileLoad::Failed(_)));
        assert_eq!(form.value(FieldName::Phone), "3001234567");
        assert_eq!(form.value(FieldName::FirstName), "");
    }

    #[tokio::test]
    async fn test_profile_with_null_columns_is_applied() {
        let (ctx, transport, mut rx) = memory_context();
        transport
            .queue_response(
                Endpoint::FetchProfile,
                json!([{"cellphone": 3001234567u64, "nombre": "Ana", "direccion": null, "tarjeta": null}]),
            )
            .await;
        let mut form =
            RegistrationForm::mount(Identity::new("3001234567", Role::Rider), Mode::Update, ctx);

        let Some(ViewEvent::ProfileLoaded { mount, result }) = rx.recv().await else {
            panic!("expected profile load event");
        };
        assert!(form.on_profile_loaded(mount, result).is_applied());
        assert_eq!(form.value(FieldName::FirstName), "Ana");
        assert_eq!(form.value(FieldName::Address), "");
    }
}
