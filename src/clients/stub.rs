//! Test doubles for the downstream services.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    clients::{
        ClientError, EmailDispatcher, EmailMessage, IdentityClient, NewIdentityUser, ProfileImage,
    },
    models::User,
};

#[derive(Default)]
struct IdentityState {
    users: HashMap<Uuid, User>,
    roles: Vec<(Uuid, String)>,
    uploads: Vec<(Uuid, ProfileImage)>,
    failure: Option<(u16, String)>,
}

/// Keeps users in memory. `fail_with` makes every call return a downstream
/// error until cleared.
#[derive(Clone, Default)]
pub struct StubIdentityClient {
    state: Arc<Mutex<IdentityState>>,
}

impl StubIdentityClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, IdentityState>, ClientError> {
        self.state
            .lock()
            .map_err(|e| ClientError::Generic(anyhow!("stub identity lock poisoned: {e}")))
    }

    fn check_failure(state: &IdentityState) -> Result<(), ClientError> {
        match &state.failure {
            Some((status_code, message)) => Err(ClientError::NetworkError {
                status_code: *status_code,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn insert_user(&self, user: User) {
        if let Ok(mut state) = self.state.lock() {
            state.users.insert(user.id, user);
        }
    }

    pub fn fail_with(&self, status_code: u16, message: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = Some((status_code, message.to_string()));
        }
    }

    pub fn assigned_roles(&self) -> Vec<(Uuid, String)> {
        self.state
            .lock()
            .map(|state| state.roles.clone())
            .unwrap_or_default()
    }

    pub fn uploads(&self) -> Vec<(Uuid, ProfileImage)> {
        self.state
            .lock()
            .map(|state| state.uploads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IdentityClient for StubIdentityClient {
    async fn get_user(&self, user_id: Uuid) -> Result<User, ClientError> {
        let state = self.lock()?;
        Self::check_failure(&state)?;
        state
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ClientError::NetworkError {
                status_code: 404,
                message: format!("user {user_id} not found"),
            })
    }

    async fn create_user(&self, user: NewIdentityUser) -> Result<User, ClientError> {
        let mut state = self.lock()?;
        Self::check_failure(&state)?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(ClientError::NetworkError {
                status_code: 409,
                message: "email already registered".into(),
            });
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            profile_image_url: None,
            created_at: Some(Utc::now()),
        };
        state.users.insert(created.id, created.clone());
        state.roles.push((created.id, user.role_id));
        Ok(created)
    }

    async fn assign_role(&self, user_id: Uuid, role_id: &str) -> Result<(), ClientError> {
        let mut state = self.lock()?;
        Self::check_failure(&state)?;
        state.roles.push((user_id, role_id.to_string()));
        Ok(())
    }

    async fn upload_profile_image(
        &self,
        user_id: Uuid,
        image: ProfileImage,
    ) -> Result<String, ClientError> {
        let mut state = self.lock()?;
        Self::check_failure(&state)?;
        let url = format!("https://images.test/{user_id}/{}", image.file_name);
        if let Some(user) = state.users.get_mut(&user_id) {
            user.profile_image_url = Some(url.clone());
        }
        state.uploads.push((user_id, image));
        Ok(url)
    }
}

/// Records dispatched emails instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingEmailDispatcher {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingEmailDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailDispatcher for RecordingEmailDispatcher {
    async fn dispatch(&self, email: EmailMessage) -> Result<(), ClientError> {
        self.sent
            .lock()
            .map_err(|e| ClientError::Generic(anyhow!("email recorder lock poisoned: {e}")))?
            .push(email);
        Ok(())
    }
}
