//! In-memory backend and fixtures for session tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tally_client::{ApiError, CompanyDirectory, CreatedCompany};
use tally_core::company::{
    Company, CompanyCache, LocalStorage, NewCompany, NewUser, UserPatch, UserRecord,
};
use tally_core::session::Session;
use tempfile::TempDir;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::SessionResolver;

fn status(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        message: message.to_string(),
    }
}

/// Fake backend holding user rows keyed by email
#[derive(Default)]
pub struct FakeDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
    companies: Mutex<Vec<Company>>,
    held: Mutex<HashMap<String, Arc<Notify>>>,
    offline: AtomicBool,
    lookup_status: Mutex<Option<u16>>,
    calls: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, email: &str, company_id: Option<&str>) {
        self.add_user_with_id(&Uuid::new_v4().to_string(), email, company_id);
    }

    pub fn add_user_with_id(&self, id: &str, email: &str, company_id: Option<&str>) {
        self.users.lock().unwrap().insert(
            email.to_string(),
            UserRecord {
                id: id.to_string(),
                email: Some(email.to_string()),
                full_name: None,
                company_id: company_id.map(str::to_string),
                role: None,
                user_type: None,
            },
        );
    }

    pub fn add_company(&self, id: &str, name: &str) {
        self.companies.lock().unwrap().push(Company {
            id: id.to_string(),
            name: name.to_string(),
            industry: None,
            created_at: None,
        });
    }

    pub fn company_of(&self, email: &str) -> Option<String> {
        self.users
            .lock()
            .unwrap()
            .get(email)
            .and_then(|u| u.linked_company().map(str::to_string))
    }

    pub fn has_user(&self, email: &str) -> bool {
        self.users.lock().unwrap().contains_key(email)
    }

    /// Every later lookup fails like an unreachable server
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Park lookups for `email` until the returned handle is notified
    pub fn hold(&self, email: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.held
            .lock()
            .unwrap()
            .insert(email.to_string(), Arc::clone(&notify));
        notify
    }

    /// Every later lookup answers with this HTTP status
    pub fn fail_lookups_with(&self, code: u16) {
        *self.lookup_status.lock().unwrap() = Some(code);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check_online(&self) -> tally_client::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(status(503, "Service Unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CompanyDirectory for FakeDirectory {
    async fn find_user(&self, email: &str) -> tally_client::Result<Option<UserRecord>> {
        self.record(format!("find_user {email}"));
        let held = self.held.lock().unwrap().get(email).cloned();
        if let Some(notify) = held {
            notify.notified().await;
        }
        self.check_online()?;
        if let Some(code) = *self.lookup_status.lock().unwrap() {
            return Err(status(code, "User not found."));
        }
        Ok(self.users.lock().unwrap().get(email).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> tally_client::Result<()> {
        self.record(format!("create_user {}", user.company_id));
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.get(&user.email) {
            return if existing.linked_company().is_some() {
                Err(status(400, crate::ALREADY_LINKED_MESSAGE))
            } else {
                Err(status(409, "User already exists"))
            };
        }
        users.insert(
            user.email.clone(),
            UserRecord {
                id: user.id.clone(),
                email: Some(user.email.clone()),
                full_name: Some(user.full_name.clone()),
                company_id: Some(user.company_id.clone()),
                role: None,
                user_type: None,
            },
        );
        Ok(())
    }

    async fn update_user(&self, user_id: &str, patch: &UserPatch) -> tally_client::Result<()> {
        self.record(format!(
            "update_user {}",
            patch.company_id.as_deref().unwrap_or("-")
        ));
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.values_mut().find(|u| u.id == user_id) else {
            return Err(status(404, "User not found."));
        };
        if let Some(new_company) = &patch.company_id {
            if let Some(current) = user.linked_company() {
                if current != new_company.as_str() {
                    return Err(status(
                        400,
                        "Cannot change company association. One email can only be associated with one company.",
                    ));
                }
            }
            user.company_id = Some(new_company.clone());
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str) -> tally_client::Result<()> {
        self.record(format!("delete_user {user_id}"));
        self.check_online()?;
        self.users.lock().unwrap().retain(|_, u| u.id != user_id);
        Ok(())
    }

    async fn list_companies(&self) -> tally_client::Result<Vec<Company>> {
        self.check_online()?;
        Ok(self.companies.lock().unwrap().clone())
    }

    async fn get_company(&self, company_id: &str) -> tally_client::Result<Company> {
        self.check_online()?;
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == company_id)
            .cloned()
            .ok_or_else(|| status(404, "Company not found."))
    }

    async fn create_company(&self, company: &NewCompany) -> tally_client::Result<CreatedCompany> {
        self.record(format!("create_company {}", company.name));
        self.check_online()?;
        let mut companies = self.companies.lock().unwrap();
        if let Some(existing) = companies.iter().find(|c| c.name == company.name) {
            return Ok(CreatedCompany {
                company: existing.clone(),
                existing: true,
                message: Some(
                    "Company with this name already exists. Using existing company.".to_string(),
                ),
            });
        }
        let created = Company {
            id: format!("co_{}", companies.len() + 100),
            name: company.name.clone(),
            industry: Some(company.industry.clone()),
            created_at: None,
        };
        companies.push(created.clone());
        Ok(CreatedCompany {
            company: created,
            existing: false,
            message: None,
        })
    }
}

pub fn session(email: &str) -> Session {
    Session::new(Uuid::new_v4(), email)
}

/// Cache wrapper that can park one `store` call
pub struct GatedCache {
    inner: Arc<LocalStorage>,
    held: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
}

impl GatedCache {
    /// Park the next `store`. The first handle fires once the write has
    /// started, notifying the second lets it finish.
    pub fn hold_store(&self) -> (Arc<Notify>, Arc<Notify>) {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        *self.held.lock().unwrap() = Some((Arc::clone(&entered), Arc::clone(&release)));
        (entered, release)
    }
}

#[async_trait]
impl CompanyCache for GatedCache {
    async fn load(&self) -> tally_core::Result<Option<String>> {
        self.inner.load().await
    }

    async fn store(&self, company_id: &str) -> tally_core::Result<()> {
        let held = self.held.lock().unwrap().take();
        if let Some((entered, release)) = held {
            entered.notify_one();
            release.notified().await;
        }
        self.inner.store(company_id).await
    }

    async fn clear(&self) -> tally_core::Result<()> {
        self.inner.clear().await
    }
}

pub struct Fixture {
    pub directory: Arc<FakeDirectory>,
    pub cache: Arc<LocalStorage>,
    pub gated: Arc<GatedCache>,
    pub resolver: Arc<SessionResolver>,
    _temp: TempDir,
}

impl Fixture {
    pub async fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let cache = Arc::new(
            LocalStorage::open(temp.path().join("local_storage.json"))
                .await
                .unwrap(),
        );
        let gated = Arc::new(GatedCache {
            inner: Arc::clone(&cache),
            held: Mutex::new(None),
        });
        let directory = FakeDirectory::new();
        let resolver = Arc::new(SessionResolver::new(
            Arc::clone(&directory) as Arc<dyn CompanyDirectory>,
            Arc::clone(&gated) as Arc<dyn CompanyCache>,
        ));
        Self {
            directory,
            cache,
            gated,
            resolver,
            _temp: temp,
        }
    }

    pub async fn cached(&self) -> Option<String> {
        self.cache.load().await.unwrap()
    }
}
