use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{RepoResult, Repository, RepositoryError};
use crate::models::{
    CreateEvacuationRequest, CreateEvacuationRouteRequest, CreateFineRequest, CreateNewsRequest,
    CreateProjectRequest, CreateServiceRequest, CreateTeamMemberRequest,
    CreateTrafficLightRequest, CreateVacancyRequest, DashboardStats, Evacuation, EvacuationRoute,
    Fine, News, NewUser, Project, Service, TeamMember, TrafficLight, TrafficSummary,
    UpdateEvacuationRequest,
    UpdateEvacuationRouteRequest, UpdateFineRequest, UpdateNewsRequest, UpdateProjectRequest,
    UpdateServiceRequest, UpdateTeamMemberRequest, UpdateTrafficLightRequest,
    UpdateVacancyRequest, User, Vacancy,
};

/// One table: rows keyed by id plus the next id to hand out. Ids start at 1 and are never
/// reused, like a `SERIAL` column.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn update_with(&mut self, id: i32, apply: impl FnOnce(&mut T)) -> Option<T> {
        let row = self.rows.get_mut(&id)?;
        apply(row);
        Some(row.clone())
    }

    fn remove(&mut self, id: i32) -> bool {
        self.rows.remove(&id).is_some()
    }

    /// All rows in id order.
    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Default)]
struct Store {
    users: Table<User>,
    fines: Table<Fine>,
    evacuations: Table<Evacuation>,
    evacuation_routes: Table<EvacuationRoute>,
    traffic_lights: Table<TrafficLight>,
    news: Table<News>,
    services: Table<Service>,
    team: Table<TeamMember>,
    projects: Table<Project>,
    vacancies: Table<Vacancy>,
}

/// Overwrites `slot` only when the update carries a value.
fn patch<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// InMemoryRepository
///
/// A `Repository` that keeps every table in process memory. It mirrors the SQL semantics
/// (server-assigned ids and timestamps, partial updates, list orderings) so the HTTP layer
/// can be exercised end to end without PostgreSQL.
///
/// Built with [`InMemoryRepository::failing`], every call returns
/// `RepositoryError::Unavailable`, which is how the 500 paths are tested.
pub struct InMemoryRepository {
    store: RwLock<Store>,
    /// When true, all operations return a simulated failure.
    should_fail: bool,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            should_fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            should_fail: true,
        }
    }

    /// Seeds a user at construction time. The password must already be hashed.
    pub fn with_user(mut self, user: NewUser) -> Self {
        let now = Utc::now();
        self.store.get_mut().users.insert_with(|id| User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        });
        self
    }

    fn check(&self) -> RepoResult<()> {
        if self.should_fail {
            return Err(RepositoryError::Unavailable(
                "in-memory repository is configured to fail".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    // --- Users ---

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.check()?;
        let store = self.store.read().await;
        Ok(store.users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        self.check()?;
        let mut store = self.store.write().await;
        if store.users.rows.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate(format!(
                "email {} is already registered",
                user.email
            )));
        }
        let now = Utc::now();
        Ok(store.users.insert_with(|id| User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            is_active: user.is_active,
            created_at: now,
            updated_at: now,
        }))
    }

    // --- Fines ---

    async fn list_fines(&self) -> RepoResult<Vec<Fine>> {
        self.check()?;
        let mut rows = self.store.read().await.fines.all();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn get_fine(&self, id: i32) -> RepoResult<Option<Fine>> {
        self.check()?;
        Ok(self.store.read().await.fines.get(id))
    }

    async fn create_fine(&self, req: CreateFineRequest) -> RepoResult<Fine> {
        self.check()?;
        let now = Utc::now();
        Ok(self.store.write().await.fines.insert_with(|id| Fine {
            id,
            date: req.date,
            violations_total: req.violations_total,
            orders_total: req.orders_total,
            fines_amount_total: req.fines_amount_total,
            collected_amount_total: req.collected_amount_total,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_fine(&self, id: i32, req: UpdateFineRequest) -> RepoResult<Option<Fine>> {
        self.check()?;
        Ok(self.store.write().await.fines.update_with(id, |row| {
            patch(&mut row.date, req.date);
            patch(&mut row.violations_total, req.violations_total);
            patch(&mut row.orders_total, req.orders_total);
            patch(&mut row.fines_amount_total, req.fines_amount_total);
            patch(&mut row.collected_amount_total, req.collected_amount_total);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_fine(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.fines.remove(id))
    }

    // --- Evacuations ---

    async fn list_evacuations(&self) -> RepoResult<Vec<Evacuation>> {
        self.check()?;
        let mut rows = self.store.read().await.evacuations.all();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn get_evacuation(&self, id: i32) -> RepoResult<Option<Evacuation>> {
        self.check()?;
        Ok(self.store.read().await.evacuations.get(id))
    }

    async fn create_evacuation(&self, req: CreateEvacuationRequest) -> RepoResult<Evacuation> {
        self.check()?;
        let now = Utc::now();
        Ok(self.store.write().await.evacuations.insert_with(|id| Evacuation {
            id,
            date: req.date,
            evacuators_count: req.evacuators_count,
            trips_count: req.trips_count,
            evacuations_count: req.evacuations_count,
            fine_lot_income: req.fine_lot_income,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_evacuation(
        &self,
        id: i32,
        req: UpdateEvacuationRequest,
    ) -> RepoResult<Option<Evacuation>> {
        self.check()?;
        Ok(self.store.write().await.evacuations.update_with(id, |row| {
            patch(&mut row.date, req.date);
            patch(&mut row.evacuators_count, req.evacuators_count);
            patch(&mut row.trips_count, req.trips_count);
            patch(&mut row.evacuations_count, req.evacuations_count);
            patch(&mut row.fine_lot_income, req.fine_lot_income);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_evacuation(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.evacuations.remove(id))
    }

    // --- Evacuation routes ---

    async fn list_evacuation_routes(&self) -> RepoResult<Vec<EvacuationRoute>> {
        self.check()?;
        let mut rows = self.store.read().await.evacuation_routes.all();
        rows.sort_by(|a, b| b.year.cmp(&a.year).then_with(|| a.month.cmp(&b.month)));
        Ok(rows)
    }

    async fn get_evacuation_route(&self, id: i32) -> RepoResult<Option<EvacuationRoute>> {
        self.check()?;
        Ok(self.store.read().await.evacuation_routes.get(id))
    }

    async fn create_evacuation_route(
        &self,
        req: CreateEvacuationRouteRequest,
    ) -> RepoResult<EvacuationRoute> {
        self.check()?;
        let now = Utc::now();
        Ok(self
            .store
            .write()
            .await
            .evacuation_routes
            .insert_with(|id| EvacuationRoute {
                id,
                year: req.year,
                month: req.month,
                route: req.route,
                created_at: now,
                updated_at: now,
            }))
    }

    async fn update_evacuation_route(
        &self,
        id: i32,
        req: UpdateEvacuationRouteRequest,
    ) -> RepoResult<Option<EvacuationRoute>> {
        self.check()?;
        Ok(self
            .store
            .write()
            .await
            .evacuation_routes
            .update_with(id, |row| {
                patch(&mut row.year, req.year);
                patch(&mut row.month, req.month);
                patch(&mut row.route, req.route);
                row.updated_at = Utc::now();
            }))
    }

    async fn delete_evacuation_route(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.evacuation_routes.remove(id))
    }

    // --- Traffic lights ---

    async fn list_traffic_lights(&self) -> RepoResult<Vec<TrafficLight>> {
        self.check()?;
        let mut rows = self.store.read().await.traffic_lights.all();
        rows.sort_by(|a, b| b.install_year.cmp(&a.install_year));
        Ok(rows)
    }

    async fn get_traffic_light(&self, id: i32) -> RepoResult<Option<TrafficLight>> {
        self.check()?;
        Ok(self.store.read().await.traffic_lights.get(id))
    }

    async fn create_traffic_light(
        &self,
        req: CreateTrafficLightRequest,
    ) -> RepoResult<TrafficLight> {
        self.check()?;
        let now = Utc::now();
        let status = req.status_or_default();
        Ok(self
            .store
            .write()
            .await
            .traffic_lights
            .insert_with(|id| TrafficLight {
                id,
                address: req.address,
                light_type: req.light_type,
                install_year: req.install_year,
                status,
                created_at: now,
                updated_at: now,
            }))
    }

    async fn update_traffic_light(
        &self,
        id: i32,
        req: UpdateTrafficLightRequest,
    ) -> RepoResult<Option<TrafficLight>> {
        self.check()?;
        Ok(self
            .store
            .write()
            .await
            .traffic_lights
            .update_with(id, |row| {
                patch(&mut row.address, req.address);
                patch(&mut row.light_type, req.light_type);
                patch(&mut row.install_year, req.install_year);
                patch(&mut row.status, req.status);
                row.updated_at = Utc::now();
            }))
    }

    async fn delete_traffic_light(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.traffic_lights.remove(id))
    }

    // --- News ---

    async fn list_news(&self) -> RepoResult<Vec<News>> {
        self.check()?;
        let mut rows = self.store.read().await.news.all();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn get_news(&self, id: i32) -> RepoResult<Option<News>> {
        self.check()?;
        Ok(self.store.read().await.news.get(id))
    }

    async fn create_news(&self, req: CreateNewsRequest) -> RepoResult<News> {
        self.check()?;
        let now = Utc::now();
        Ok(self.store.write().await.news.insert_with(|id| News {
            id,
            title: req.title,
            content: req.content,
            tag: req.tag,
            date: now,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_news(&self, id: i32, req: UpdateNewsRequest) -> RepoResult<Option<News>> {
        self.check()?;
        Ok(self.store.write().await.news.update_with(id, |row| {
            patch(&mut row.title, req.title);
            patch(&mut row.content, req.content);
            patch(&mut row.tag, req.tag);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_news(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.news.remove(id))
    }

    // --- Services ---

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        self.check()?;
        Ok(self.store.read().await.services.all())
    }

    async fn get_service(&self, id: i32) -> RepoResult<Option<Service>> {
        self.check()?;
        Ok(self.store.read().await.services.get(id))
    }

    async fn create_service(&self, req: CreateServiceRequest) -> RepoResult<Service> {
        self.check()?;
        let now = Utc::now();
        Ok(self.store.write().await.services.insert_with(|id| Service {
            id,
            title: req.title,
            description: req.description,
            price: req.price,
            category: req.category,
            icon_url: req.icon_url,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_service(
        &self,
        id: i32,
        req: UpdateServiceRequest,
    ) -> RepoResult<Option<Service>> {
        self.check()?;
        Ok(self.store.write().await.services.update_with(id, |row| {
            patch(&mut row.title, req.title);
            patch(&mut row.description, req.description);
            patch(&mut row.price, req.price);
            patch(&mut row.category, req.category);
            patch(&mut row.icon_url, req.icon_url);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_service(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.services.remove(id))
    }

    // --- Team ---

    async fn list_team_members(&self) -> RepoResult<Vec<TeamMember>> {
        self.check()?;
        Ok(self.store.read().await.team.all())
    }

    async fn get_team_member(&self, id: i32) -> RepoResult<Option<TeamMember>> {
        self.check()?;
        Ok(self.store.read().await.team.get(id))
    }

    async fn create_team_member(&self, req: CreateTeamMemberRequest) -> RepoResult<TeamMember> {
        self.check()?;
        let now = Utc::now();
        Ok(self.store.write().await.team.insert_with(|id| TeamMember {
            id,
            name: req.name,
            position: req.position,
            experience: req.experience,
            photo_url: req.photo_url,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_team_member(
        &self,
        id: i32,
        req: UpdateTeamMemberRequest,
    ) -> RepoResult<Option<TeamMember>> {
        self.check()?;
        Ok(self.store.write().await.team.update_with(id, |row| {
            patch(&mut row.name, req.name);
            patch(&mut row.position, req.position);
            patch(&mut row.experience, req.experience);
            patch(&mut row.photo_url, req.photo_url);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_team_member(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.team.remove(id))
    }

    // --- Projects ---

    async fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.check()?;
        Ok(self.store.read().await.projects.all())
    }

    async fn get_project(&self, id: i32) -> RepoResult<Option<Project>> {
        self.check()?;
        Ok(self.store.read().await.projects.get(id))
    }

    async fn create_project(&self, req: CreateProjectRequest) -> RepoResult<Project> {
        self.check()?;
        let now = Utc::now();
        let status = req.status_or_default();
        Ok(self.store.write().await.projects.insert_with(|id| Project {
            id,
            title: req.title,
            description: req.description,
            category: req.category,
            status,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_project(
        &self,
        id: i32,
        req: UpdateProjectRequest,
    ) -> RepoResult<Option<Project>> {
        self.check()?;
        Ok(self.store.write().await.projects.update_with(id, |row| {
            patch(&mut row.title, req.title);
            patch(&mut row.description, req.description);
            patch(&mut row.category, req.category);
            patch(&mut row.status, req.status);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_project(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.projects.remove(id))
    }

    // --- Vacancies ---

    async fn list_vacancies(&self) -> RepoResult<Vec<Vacancy>> {
        self.check()?;
        let mut rows = self.store.read().await.vacancies.all();
        rows.reverse();
        Ok(rows)
    }

    async fn get_vacancy(&self, id: i32) -> RepoResult<Option<Vacancy>> {
        self.check()?;
        Ok(self.store.read().await.vacancies.get(id))
    }

    async fn create_vacancy(&self, req: CreateVacancyRequest) -> RepoResult<Vacancy> {
        self.check()?;
        let now = Utc::now();
        Ok(self.store.write().await.vacancies.insert_with(|id| Vacancy {
            id,
            position: req.position,
            experience: req.experience,
            salary: req.salary,
            created_at: now,
            updated_at: now,
        }))
    }

    async fn update_vacancy(
        &self,
        id: i32,
        req: UpdateVacancyRequest,
    ) -> RepoResult<Option<Vacancy>> {
        self.check()?;
        Ok(self.store.write().await.vacancies.update_with(id, |row| {
            patch(&mut row.position, req.position);
            patch(&mut row.experience, req.experience);
            patch(&mut row.salary, req.salary);
            row.updated_at = Utc::now();
        }))
    }

    async fn delete_vacancy(&self, id: i32) -> RepoResult<bool> {
        self.check()?;
        Ok(self.store.write().await.vacancies.remove(id))
    }

    // --- Aggregates ---

    async fn get_stats(&self) -> RepoResult<DashboardStats> {
        self.check()?;
        let store = self.store.read().await;

        let latest_fine = store.fines.rows.values().max_by_key(|f| f.date);
        let latest_evacuation = store.evacuations.rows.values().max_by_key(|e| e.date);
        let active = store
            .traffic_lights
            .rows
            .values()
            .filter(|t| t.status == "active")
            .count() as i64;

        Ok(DashboardStats::from_latest(
            latest_fine,
            latest_evacuation,
            active,
        ))
    }

    async fn get_traffic(&self) -> RepoResult<TrafficSummary> {
        self.check()?;
        let store = self.store.read().await;

        let mut summary = TrafficSummary::default();
        for light in store.traffic_lights.rows.values() {
            *summary
                .light_types
                .entry(light.light_type.clone())
                .or_default() += 1;
            *summary.install_years.entry(light.install_year).or_default() += 1;
        }
        Ok(summary)
    }
}
