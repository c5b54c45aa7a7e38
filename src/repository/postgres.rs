use async_trait::async_trait;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::{collections::BTreeMap, time::Duration};

use super::{RepoResult, Repository};
use crate::{
    config::AppConfig,
    models::{
        CreateEvacuationRequest, CreateEvacuationRouteRequest, CreateFineRequest,
        CreateNewsRequest, CreateProjectRequest, CreateServiceRequest, CreateTeamMemberRequest,
        CreateTrafficLightRequest, CreateVacancyRequest, DashboardStats, Evacuation,
        EvacuationRoute, Fine, News, NewUser, Project, Service, TeamMember, TrafficLight,
        TrafficSummary, UpdateEvacuationRequest, UpdateEvacuationRouteRequest, UpdateFineRequest,
        UpdateNewsRequest, UpdateProjectRequest, UpdateServiceRequest, UpdateTeamMemberRequest,
        UpdateTrafficLightRequest, UpdateVacancyRequest, User, Vacancy,
    },
};

const MAX_CONNECTIONS: u32 = 10;
const MAX_CONNECTION_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by the PostgreSQL database.
/// Every method is one parameterized statement; partial updates use `COALESCE` so that a
/// `NULL` bind leaves the column untouched. Nullable URL columns carry an extra "present"
/// flag instead, so an explicit `null` can clear them.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using an already initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens the bounded pool described by `config` and verifies one connection.
    pub async fn connect(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password)
            .database(&config.db_name);

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .max_lifetime(MAX_CONNECTION_LIFETIME)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    // --- Users ---

    async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, role, is_active, created_at, updated_at
            FROM public.users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO public.users (email, password, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, email, password, role, is_active, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    // --- Fines ---

    async fn list_fines(&self) -> RepoResult<Vec<Fine>> {
        let rows = sqlx::query_as::<_, Fine>(
            r#"
            SELECT id, date, violations_total, orders_total, fines_amount_total,
                   collected_amount_total, created_at, updated_at
            FROM public.fines
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_fine(&self, id: i32) -> RepoResult<Option<Fine>> {
        let row = sqlx::query_as::<_, Fine>(
            r#"
            SELECT id, date, violations_total, orders_total, fines_amount_total,
                   collected_amount_total, created_at, updated_at
            FROM public.fines
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_fine(&self, req: CreateFineRequest) -> RepoResult<Fine> {
        let row = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO public.fines (date, violations_total, orders_total, fines_amount_total,
                                      collected_amount_total, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, date, violations_total, orders_total, fines_amount_total,
                      collected_amount_total, created_at, updated_at
            "#,
        )
        .bind(req.date)
        .bind(req.violations_total)
        .bind(req.orders_total)
        .bind(req.fines_amount_total)
        .bind(req.collected_amount_total)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_fine(&self, id: i32, req: UpdateFineRequest) -> RepoResult<Option<Fine>> {
        let row = sqlx::query_as::<_, Fine>(
            r#"
            UPDATE public.fines
            SET date = COALESCE($2, date),
                violations_total = COALESCE($3, violations_total),
                orders_total = COALESCE($4, orders_total),
                fines_amount_total = COALESCE($5, fines_amount_total),
                collected_amount_total = COALESCE($6, collected_amount_total),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, date, violations_total, orders_total, fines_amount_total,
                      collected_amount_total, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.date)
        .bind(req.violations_total)
        .bind(req.orders_total)
        .bind(req.fines_amount_total)
        .bind(req.collected_amount_total)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_fine(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.fines WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Evacuations ---

    async fn list_evacuations(&self) -> RepoResult<Vec<Evacuation>> {
        let rows = sqlx::query_as::<_, Evacuation>(
            r#"
            SELECT id, date, evacuators_count, trips_count, evacuations_count, fine_lot_income,
                   created_at, updated_at
            FROM public.evacuations
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_evacuation(&self, id: i32) -> RepoResult<Option<Evacuation>> {
        let row = sqlx::query_as::<_, Evacuation>(
            r#"
            SELECT id, date, evacuators_count, trips_count, evacuations_count, fine_lot_income,
                   created_at, updated_at
            FROM public.evacuations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_evacuation(&self, req: CreateEvacuationRequest) -> RepoResult<Evacuation> {
        let row = sqlx::query_as::<_, Evacuation>(
            r#"
            INSERT INTO public.evacuations (date, evacuators_count, trips_count,
                                            evacuations_count, fine_lot_income,
                                            created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, date, evacuators_count, trips_count, evacuations_count,
                      fine_lot_income, created_at, updated_at
            "#,
        )
        .bind(req.date)
        .bind(req.evacuators_count)
        .bind(req.trips_count)
        .bind(req.evacuations_count)
        .bind(req.fine_lot_income)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_evacuation(
        &self,
        id: i32,
        req: UpdateEvacuationRequest,
    ) -> RepoResult<Option<Evacuation>> {
        let row = sqlx::query_as::<_, Evacuation>(
            r#"
            UPDATE public.evacuations
            SET date = COALESCE($2, date),
                evacuators_count = COALESCE($3, evacuators_count),
                trips_count = COALESCE($4, trips_count),
                evacuations_count = COALESCE($5, evacuations_count),
                fine_lot_income = COALESCE($6, fine_lot_income),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, date, evacuators_count, trips_count, evacuations_count,
                      fine_lot_income, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.date)
        .bind(req.evacuators_count)
        .bind(req.trips_count)
        .bind(req.evacuations_count)
        .bind(req.fine_lot_income)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_evacuation(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.evacuations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Evacuation routes ---

    async fn list_evacuation_routes(&self) -> RepoResult<Vec<EvacuationRoute>> {
        let rows = sqlx::query_as::<_, EvacuationRoute>(
            r#"
            SELECT id, year, month, route, created_at, updated_at
            FROM public.evacuation_routes
            ORDER BY year DESC, month
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_evacuation_route(&self, id: i32) -> RepoResult<Option<EvacuationRoute>> {
        let row = sqlx::query_as::<_, EvacuationRoute>(
            r#"
            SELECT id, year, month, route, created_at, updated_at
            FROM public.evacuation_routes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_evacuation_route(
        &self,
        req: CreateEvacuationRouteRequest,
    ) -> RepoResult<EvacuationRoute> {
        let row = sqlx::query_as::<_, EvacuationRoute>(
            r#"
            INSERT INTO public.evacuation_routes (year, month, route, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, year, month, route, created_at, updated_at
            "#,
        )
        .bind(req.year)
        .bind(&req.month)
        .bind(&req.route)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_evacuation_route(
        &self,
        id: i32,
        req: UpdateEvacuationRouteRequest,
    ) -> RepoResult<Option<EvacuationRoute>> {
        let row = sqlx::query_as::<_, EvacuationRoute>(
            r#"
            UPDATE public.evacuation_routes
            SET year = COALESCE($2, year),
                month = COALESCE($3, month),
                route = COALESCE($4, route),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, year, month, route, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.year)
        .bind(req.month)
        .bind(req.route)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_evacuation_route(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.evacuation_routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Traffic lights ---

    async fn list_traffic_lights(&self) -> RepoResult<Vec<TrafficLight>> {
        let rows = sqlx::query_as::<_, TrafficLight>(
            r#"
            SELECT id, address, light_type, install_year, status, created_at, updated_at
            FROM public.traffic_lights
            ORDER BY install_year DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_traffic_light(&self, id: i32) -> RepoResult<Option<TrafficLight>> {
        let row = sqlx::query_as::<_, TrafficLight>(
            r#"
            SELECT id, address, light_type, install_year, status, created_at, updated_at
            FROM public.traffic_lights
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_traffic_light(
        &self,
        req: CreateTrafficLightRequest,
    ) -> RepoResult<TrafficLight> {
        let status = req.status_or_default();
        let row = sqlx::query_as::<_, TrafficLight>(
            r#"
            INSERT INTO public.traffic_lights (address, light_type, install_year, status,
                                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, address, light_type, install_year, status, created_at, updated_at
            "#,
        )
        .bind(&req.address)
        .bind(&req.light_type)
        .bind(req.install_year)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_traffic_light(
        &self,
        id: i32,
        req: UpdateTrafficLightRequest,
    ) -> RepoResult<Option<TrafficLight>> {
        let row = sqlx::query_as::<_, TrafficLight>(
            r#"
            UPDATE public.traffic_lights
            SET address = COALESCE($2, address),
                light_type = COALESCE($3, light_type),
                install_year = COALESCE($4, install_year),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, address, light_type, install_year, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.address)
        .bind(req.light_type)
        .bind(req.install_year)
        .bind(req.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_traffic_light(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.traffic_lights WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- News ---

    async fn list_news(&self) -> RepoResult<Vec<News>> {
        let rows = sqlx::query_as::<_, News>(
            r#"
            SELECT id, title, content, tag, date, created_at, updated_at
            FROM public.news
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_news(&self, id: i32) -> RepoResult<Option<News>> {
        let row = sqlx::query_as::<_, News>(
            r#"
            SELECT id, title, content, tag, date, created_at, updated_at
            FROM public.news
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_news(&self, req: CreateNewsRequest) -> RepoResult<News> {
        // Publication date is the creation time.
        let row = sqlx::query_as::<_, News>(
            r#"
            INSERT INTO public.news (title, content, tag, date, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW(), NOW())
            RETURNING id, title, content, tag, date, created_at, updated_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.tag)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_news(&self, id: i32, req: UpdateNewsRequest) -> RepoResult<Option<News>> {
        let row = sqlx::query_as::<_, News>(
            r#"
            UPDATE public.news
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                tag = COALESCE($4, tag),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, content, tag, date, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.content)
        .bind(req.tag)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_news(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Services ---

    async fn list_services(&self) -> RepoResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, title, description, price, category, icon_url, created_at, updated_at
            FROM public.services
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_service(&self, id: i32) -> RepoResult<Option<Service>> {
        let row = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, title, description, price, category, icon_url, created_at, updated_at
            FROM public.services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_service(&self, req: CreateServiceRequest) -> RepoResult<Service> {
        let row = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO public.services (title, description, price, category, icon_url,
                                         created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, title, description, price, category, icon_url, created_at, updated_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.price)
        .bind(&req.category)
        .bind(&req.icon_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_service(
        &self,
        id: i32,
        req: UpdateServiceRequest,
    ) -> RepoResult<Option<Service>> {
        let icon_url_present = req.icon_url.is_some();
        let row = sqlx::query_as::<_, Service>(
            r#"
            UPDATE public.services
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                category = COALESCE($5, category),
                icon_url = CASE WHEN $7 THEN $6 ELSE icon_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, price, category, icon_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.price)
        .bind(req.category)
        .bind(req.icon_url.flatten())
        .bind(icon_url_present)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_service(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Team ---

    async fn list_team_members(&self) -> RepoResult<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT id, name, position, experience, photo_url, created_at, updated_at
            FROM public.team
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_team_member(&self, id: i32) -> RepoResult<Option<TeamMember>> {
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            SELECT id, name, position, experience, photo_url, created_at, updated_at
            FROM public.team
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_team_member(&self, req: CreateTeamMemberRequest) -> RepoResult<TeamMember> {
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            INSERT INTO public.team (name, position, experience, photo_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, name, position, experience, photo_url, created_at, updated_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.position)
        .bind(&req.experience)
        .bind(&req.photo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_team_member(
        &self,
        id: i32,
        req: UpdateTeamMemberRequest,
    ) -> RepoResult<Option<TeamMember>> {
        let photo_url_present = req.photo_url.is_some();
        let row = sqlx::query_as::<_, TeamMember>(
            r#"
            UPDATE public.team
            SET name = COALESCE($2, name),
                position = COALESCE($3, position),
                experience = COALESCE($4, experience),
                photo_url = CASE WHEN $6 THEN $5 ELSE photo_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, position, experience, photo_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.name)
        .bind(req.position)
        .bind(req.experience)
        .bind(req.photo_url.flatten())
        .bind(photo_url_present)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_team_member(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.team WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Projects ---

    async fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, status, created_at, updated_at
            FROM public.projects
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_project(&self, id: i32) -> RepoResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, category, status, created_at, updated_at
            FROM public.projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_project(&self, req: CreateProjectRequest) -> RepoResult<Project> {
        let status = req.status_or_default();
        let row = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO public.projects (title, description, category, status,
                                         created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, title, description, category, status, created_at, updated_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.category)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_project(
        &self,
        id: i32,
        req: UpdateProjectRequest,
    ) -> RepoResult<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(
            r#"
            UPDATE public.projects
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, category, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.description)
        .bind(req.category)
        .bind(req.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_project(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Vacancies ---

    async fn list_vacancies(&self) -> RepoResult<Vec<Vacancy>> {
        let rows = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, position, experience, salary, created_at, updated_at
            FROM public.vacancies
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_vacancy(&self, id: i32) -> RepoResult<Option<Vacancy>> {
        let row = sqlx::query_as::<_, Vacancy>(
            r#"
            SELECT id, position, experience, salary, created_at, updated_at
            FROM public.vacancies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_vacancy(&self, req: CreateVacancyRequest) -> RepoResult<Vacancy> {
        let row = sqlx::query_as::<_, Vacancy>(
            r#"
            INSERT INTO public.vacancies (position, experience, salary, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, position, experience, salary, created_at, updated_at
            "#,
        )
        .bind(&req.position)
        .bind(&req.experience)
        .bind(&req.salary)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_vacancy(
        &self,
        id: i32,
        req: UpdateVacancyRequest,
    ) -> RepoResult<Option<Vacancy>> {
        let row = sqlx::query_as::<_, Vacancy>(
            r#"
            UPDATE public.vacancies
            SET position = COALESCE($2, position),
                experience = COALESCE($3, experience),
                salary = COALESCE($4, salary),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, position, experience, salary, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(req.position)
        .bind(req.experience)
        .bind(req.salary)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_vacancy(&self, id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM public.vacancies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Aggregates ---

    /// get_stats
    ///
    /// Three reads: the latest fine report, the latest evacuation report and the count of
    /// active traffic lights. Either report may be missing on a fresh database.
    async fn get_stats(&self) -> RepoResult<DashboardStats> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            SELECT id, date, violations_total, orders_total, fines_amount_total,
                   collected_amount_total, created_at, updated_at
            FROM public.fines
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let evacuation = sqlx::query_as::<_, Evacuation>(
            r#"
            SELECT id, date, evacuators_count, trips_count, evacuations_count, fine_lot_income,
                   created_at, updated_at
            FROM public.evacuations
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM public.traffic_lights WHERE status = 'active'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardStats::from_latest(
            fine.as_ref(),
            evacuation.as_ref(),
            active,
        ))
    }

    async fn get_traffic(&self) -> RepoResult<TrafficSummary> {
        let by_type: Vec<(String, i64)> = sqlx::query_as(
            "SELECT light_type, COUNT(*) FROM public.traffic_lights GROUP BY light_type",
        )
        .fetch_all(&self.pool)
        .await?;

        let by_year: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT install_year, COUNT(*) FROM public.traffic_lights GROUP BY install_year",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(TrafficSummary {
            light_types: by_type.into_iter().collect::<BTreeMap<_, _>>(),
            install_years: by_year.into_iter().collect::<BTreeMap<_, _>>(),
        })
    }
}
