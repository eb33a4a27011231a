use async_trait::async_trait;
use common::{EventId, OrderId, ProductCode, TERMINAL_STATUSES, UserId};
use sqlx::{
    PgPool, Postgres, Row, Transaction,
    postgres::{PgPoolOptions, PgRow},
};

use crate::{
    Event, Product, ProductQuery, Result, StoredOrder, User,
    repository::{EventRepository, OrderRepository, ProductRepository, UserRepository},
};

const ORDER_COLUMNS: &str = "id, order_date, customer_id, line_items, status, total";
const PRODUCT_COLUMNS: &str = "code, name, image, price, manufacturer, distributor, brand, material, description, link, category";
const USER_COLUMNS: &str = "id, username, email, password, birth_date, phone, address, region, commune, role, discount_eligible, profile_image";
const EVENT_COLUMNS: &str = "id, image_src, image_alt, title, description";

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool against `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        tracing::info!(max_connections, "connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    fn terminal_statuses() -> Vec<String> {
        TERMINAL_STATUSES.iter().map(|s| s.to_string()).collect()
    }

    /// Advances the id sequence of `table` past an explicitly written `id`.
    /// The sequence never moves backwards.
    async fn advance_sequence(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        id: i32,
    ) -> Result<()> {
        sqlx::query(&format!(
            r#"
            SELECT setval('{table}_id_seq', $1)
            FROM {table}_id_seq
            WHERE $1 >= CASE WHEN is_called THEN last_value + 1 ELSE last_value END
            "#
        ))
        .bind(i64::from(id))
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    fn row_to_order(row: PgRow) -> Result<StoredOrder> {
        Ok(StoredOrder {
            id: Some(OrderId::new(row.try_get("id")?)),
            date: row.try_get("order_date")?,
            customer_id: UserId::new(row.try_get("customer_id")?),
            line_items: row.try_get("line_items")?,
            status: row.try_get("status")?,
            total: row.try_get("total")?,
        })
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            code: ProductCode::new(row.try_get::<String, _>("code")?),
            name: row.try_get("name")?,
            image: row.try_get("image")?,
            price: row.try_get("price")?,
            manufacturer: row.try_get("manufacturer")?,
            distributor: row.try_get("distributor")?,
            brand: row.try_get("brand")?,
            material: row.try_get("material")?,
            description: row.try_get("description")?,
            link: row.try_get("link")?,
            category: row.try_get("category")?,
        })
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        Ok(User {
            id: Some(UserId::new(row.try_get("id")?)),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password: row.try_get("password")?,
            birth_date: row.try_get("birth_date")?,
            phone: row.try_get("phone")?,
            address: row.try_get("address")?,
            region: row.try_get("region")?,
            commune: row.try_get("commune")?,
            role: row.try_get("role")?,
            discount_eligible: row.try_get("discount_eligible")?,
            profile_image: row.try_get("profile_image")?,
        })
    }

    fn row_to_event(row: PgRow) -> Result<Event> {
        Ok(Event {
            id: Some(EventId::new(row.try_get("id")?)),
            image_src: row.try_get("image_src")?,
            image_alt: row.try_get("image_alt")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
        })
    }
}

#[async_trait]
impl OrderRepository for PostgresStore {
    async fn save_order(&self, order: StoredOrder) -> Result<StoredOrder> {
        let Some(id) = order.id else {
            let row = sqlx::query(&format!(
                r#"
                INSERT INTO orders (order_date, customer_id, line_items, status, total)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {ORDER_COLUMNS}
                "#
            ))
            .bind(&order.date)
            .bind(order.customer_id.as_i32())
            .bind(&order.line_items)
            .bind(&order.status)
            .bind(order.total)
            .fetch_one(&self.pool)
            .await?;
            return Self::row_to_order(row);
        };

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO orders (id, order_date, customer_id, line_items, status, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                order_date = EXCLUDED.order_date,
                customer_id = EXCLUDED.customer_id,
                line_items = EXCLUDED.line_items,
                status = EXCLUDED.status,
                total = EXCLUDED.total
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&order.date)
        .bind(order.customer_id.as_i32())
        .bind(&order.line_items)
        .bind(&order.status)
        .bind(order.total)
        .fetch_one(&mut *tx)
        .await?;
        Self::advance_sequence(&mut tx, "orders", id.as_i32()).await?;
        tx.commit().await?;

        Self::row_to_order(row)
    }

    async fn find_all_orders(&self) -> Result<Vec<StoredOrder>> {
        let rows = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<StoredOrder>> {
        let row: Option<PgRow> =
            sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn find_orders_by_customer(&self, customer_id: UserId) -> Result<Vec<StoredOrder>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY id ASC"
        ))
        .bind(customer_id.as_i32())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn delete_order(&self, id: OrderId) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn exists_active_order_for_customer(&self, customer_id: UserId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM orders
                WHERE status <> ALL($1) AND customer_id = $2
            )
            "#,
        )
        .bind(Self::terminal_statuses())
        .bind(customer_id.as_i32())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn exists_active_order_with_line_text(&self, needles: &[String]) -> Result<bool> {
        // strpos keeps the match a plain substring search, so '%' and '_'
        // inside a code are not wildcards.
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM orders o
                WHERE o.status <> ALL($1)
                  AND o.line_items IS NOT NULL
                  AND EXISTS (
                      SELECT 1 FROM unnest($2::text[]) AS n(needle)
                      WHERE strpos(o.line_items, n.needle) > 0
                  )
            )
            "#,
        )
        .bind(Self::terminal_statuses())
        .bind(needles.to_vec())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl ProductRepository for PostgresStore {
    async fn save_product(&self, product: Product) -> Result<Product> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO products ({PRODUCT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (code) DO UPDATE SET
                name = EXCLUDED.name,
                image = EXCLUDED.image,
                price = EXCLUDED.price,
                manufacturer = EXCLUDED.manufacturer,
                distributor = EXCLUDED.distributor,
                brand = EXCLUDED.brand,
                material = EXCLUDED.material,
                description = EXCLUDED.description,
                link = EXCLUDED.link,
                category = EXCLUDED.category
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(product.code.as_str())
        .bind(&product.name)
        .bind(&product.image)
        .bind(product.price)
        .bind(&product.manufacturer)
        .bind(&product.distributor)
        .bind(&product.brand)
        .bind(&product.material)
        .bind(&product.description)
        .bind(&product.link)
        .bind(&product.category)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }

    async fn find_all_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY code ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn find_product(&self, code: &ProductCode) -> Result<Option<Product>> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE code = $1"
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn search_products(&self, query: ProductQuery) -> Result<Vec<Product>> {
        let mut sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if query.category.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND category = ${param_count}"));
        }
        if query.manufacturer.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND manufacturer = ${param_count}"));
        }
        if query.brand.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND brand = ${param_count}"));
        }
        if query.min_price.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND price >= ${param_count}"));
        }
        if query.max_price.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND price <= ${param_count}"));
        }
        if query.name_contains.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND strpos(lower(name), lower(${param_count})) > 0"));
        }

        sql.push_str(" ORDER BY code ASC");

        let mut sqlx_query = sqlx::query(&sql);

        if let Some(category) = query.category {
            sqlx_query = sqlx_query.bind(category);
        }
        if let Some(manufacturer) = query.manufacturer {
            sqlx_query = sqlx_query.bind(manufacturer);
        }
        if let Some(brand) = query.brand {
            sqlx_query = sqlx_query.bind(brand);
        }
        if let Some(min) = query.min_price {
            sqlx_query = sqlx_query.bind(min);
        }
        if let Some(max) = query.max_price {
            sqlx_query = sqlx_query.bind(max);
        }
        if let Some(fragment) = query.name_contains {
            sqlx_query = sqlx_query.bind(fragment);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn product_exists(&self, code: &ProductCode) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE code = $1)")
                .bind(code.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn delete_product(&self, code: &ProductCode) -> Result<()> {
        sqlx::query("DELETE FROM products WHERE code = $1")
            .bind(code.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn save_user(&self, user: User) -> Result<User> {
        let Some(id) = user.id else {
            let row = sqlx::query(&format!(
                r#"
                INSERT INTO users (username, email, password, birth_date, phone, address, region, commune, role, discount_eligible, profile_image)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING {USER_COLUMNS}
                "#
            ))
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.birth_date)
            .bind(&user.phone)
            .bind(&user.address)
            .bind(&user.region)
            .bind(&user.commune)
            .bind(&user.role)
            .bind(user.discount_eligible)
            .bind(&user.profile_image)
            .fetch_one(&self.pool)
            .await?;
            return Self::row_to_user(row);
        };

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users ({USER_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                username = EXCLUDED.username,
                email = EXCLUDED.email,
                password = EXCLUDED.password,
                birth_date = EXCLUDED.birth_date,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                region = EXCLUDED.region,
                commune = EXCLUDED.commune,
                role = EXCLUDED.role,
                discount_eligible = EXCLUDED.discount_eligible,
                profile_image = EXCLUDED.profile_image
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.birth_date)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.region)
        .bind(&user.commune)
        .bind(&user.role)
        .bind(user.discount_eligible)
        .bind(&user.profile_image)
        .fetch_one(&mut *tx)
        .await?;
        Self::advance_sequence(&mut tx, "users", id.as_i32()).await?;
        tx.commit().await?;

        Self::row_to_user(row)
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_user).collect()
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        let row: Option<PgRow> =
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn user_exists(&self, id: UserId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(id.as_i32())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EventRepository for PostgresStore {
    async fn save_event(&self, event: Event) -> Result<Event> {
        let Some(id) = event.id else {
            let row = sqlx::query(&format!(
                r#"
                INSERT INTO events (image_src, image_alt, title, description)
                VALUES ($1, $2, $3, $4)
                RETURNING {EVENT_COLUMNS}
                "#
            ))
            .bind(&event.image_src)
            .bind(&event.image_alt)
            .bind(&event.title)
            .bind(&event.description)
            .fetch_one(&self.pool)
            .await?;
            return Self::row_to_event(row);
        };

        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO events ({EVENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                image_src = EXCLUDED.image_src,
                image_alt = EXCLUDED.image_alt,
                title = EXCLUDED.title,
                description = EXCLUDED.description
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&event.image_src)
        .bind(&event.image_alt)
        .bind(&event.title)
        .bind(&event.description)
        .fetch_one(&mut *tx)
        .await?;
        Self::advance_sequence(&mut tx, "events", id.as_i32()).await?;
        tx.commit().await?;

        Self::row_to_event(row)
    }

    async fn find_all_events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_event).collect()
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>> {
        let row: Option<PgRow> =
            sqlx::query(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Self::row_to_event).transpose()
    }

    async fn delete_event(&self, id: EventId) -> Result<()> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
