//! Postgres store
//!
//! One table per collection. Line items, addresses and inquiry responses are
//! JSONB documents; enums are TEXT columns parsed at the row boundary. The
//! stock reservation primitive is a single conditional `UPDATE`, so two
//! concurrent orders can never jointly drive a quantity below zero.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{
    Inquiry, InquiryResponse, InquiryStatus, Order, OrderStatus, Product, Session, User,
};
use crate::store::{
    CatalogStore, InquiryFilter, InquiryStats, InquiryStore, OrderFilter, OrderStore, Page,
    PageRequest, ProductFilter, StatusCount, UserStore,
};
use crate::{Error, Result};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::internal(format!("migration failed: {e}")))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    original_price: Option<Decimal>,
    images: Vec<String>,
    category: String,
    color: String,
    weight: String,
    origin: String,
    quality: String,
    in_stock: bool,
    stock_quantity: i64,
    rating: f64,
    reviews: i64,
    tags: Vec<String>,
    featured: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = Error;
    fn try_from(row: ProductRow) -> Result<Self> {
        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            images: row.images,
            category: row.category.parse().map_err(Error::Internal)?,
            color: row.color,
            weight: row.weight,
            origin: row.origin,
            quality: row.quality.parse().map_err(Error::Internal)?,
            in_stock: row.in_stock,
            stock_quantity: row.stock_quantity,
            rating: row.rating,
            reviews: row.reviews,
            tags: row.tags,
            featured: row.featured,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_number: String,
    customer_id: Uuid,
    items: serde_json::Value,
    total_amount: Decimal,
    shipping_address: serde_json::Value,
    payment_method: String,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = Error;
    fn try_from(row: OrderRow) -> Result<Self> {
        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            customer_id: row.customer_id,
            items: serde_json::from_value(row.items)
                .map_err(|e| Error::internal(format!("bad line items: {e}")))?,
            total_amount: row.total_amount,
            shipping_address: serde_json::from_value(row.shipping_address)
                .map_err(|e| Error::internal(format!("bad shipping address: {e}")))?,
            payment_method: row.payment_method,
            notes: row.notes,
            status: row.status.parse().map_err(Error::Internal)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InquiryRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    subject: String,
    message: String,
    inquiry_type: String,
    product_id: Option<Uuid>,
    quantity: Option<i64>,
    status: String,
    assigned_to: Option<Uuid>,
    response: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InquiryRow> for Inquiry {
    type Error = Error;
    fn try_from(row: InquiryRow) -> Result<Self> {
        let response = row
            .response
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| Error::internal(format!("bad inquiry response: {e}")))?;
        Ok(Inquiry {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            subject: row.subject,
            message: row.message,
            inquiry_type: row.inquiry_type.parse().map_err(Error::Internal)?,
            product_id: row.product_id,
            quantity: row.quantity,
            status: row.status.parse().map_err(Error::Internal)?,
            assigned_to: row.assigned_to,
            response,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = Error;
    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            role: row.role.parse().map_err(Error::Internal)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: String,
    user_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = Error;
    fn try_from(row: SessionRow) -> Result<Self> {
        Ok(Session {
            token: row.token,
            user_id: row.user_id,
            role: row.role.parse().map_err(Error::Internal)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn insert_product(&self, product: Product) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (id, name, description, price, original_price, images, category, \
             color, weight, origin, quality, in_stock, stock_quantity, rating, reviews, tags, \
             featured, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING *",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.images)
        .bind(product.category.as_str())
        .bind(&product.color)
        .bind(&product.weight)
        .bind(&product.origin)
        .bind(product.quality.as_str())
        .bind(product.in_stock)
        .bind(product.stock_quantity)
        .bind(product.rating)
        .bind(product.reviews)
        .bind(&product.tags)
        .bind(product.featured)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn product(&self, id: Uuid) -> Result<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> Result<Page<Product>> {
        let category = filter.category.map(|c| c.as_str());
        let clause = "($1::text IS NULL OR category = $1) \
             AND ($2::bool IS NULL OR featured = $2) \
             AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' \
                  OR description ILIKE '%' || $3 || '%' \
                  OR array_to_string(tags, ' ') ILIKE '%' || $3 || '%') \
             AND ($4::bool OR is_active)";
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT * FROM products WHERE {clause} \
             ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(category)
        .bind(filter.featured)
        .bind(filter.search.as_deref())
        .bind(filter.include_inactive)
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        let (total,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM products WHERE {clause}"
        ))
        .bind(category)
        .bind(filter.featured)
        .bind(filter.search.as_deref())
        .bind(filter.include_inactive)
        .fetch_one(&self.pool)
        .await?;
        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Product>>>()?;
        Ok(Page { items, total })
    }

    async fn update_product(&self, product: Product) -> Result<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET name = $2, description = $3, price = $4, original_price = $5, \
             images = $6, category = $7, color = $8, weight = $9, origin = $10, quality = $11, \
             in_stock = $12, stock_quantity = $13, rating = $14, reviews = $15, tags = $16, \
             featured = $17, is_active = $18, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.images)
        .bind(product.category.as_str())
        .bind(&product.color)
        .bind(&product.weight)
        .bind(&product.origin)
        .bind(product.quality.as_str())
        .bind(product.in_stock)
        .bind(product.stock_quantity)
        .bind(product.rating)
        .bind(product.reviews)
        .bind(&product.tags)
        .bind(product.featured)
        .bind(product.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound("product"))?;
        row.try_into()
    }

    async fn deactivate_product(&self, id: Uuid) -> Result<()> {
        let result =
            sqlx::query("UPDATE products SET is_active = false, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("product"));
        }
        Ok(())
    }

    async fn adjust_stock(&self, id: Uuid, delta: i64) -> Result<Product> {
        // The guard lives in the WHERE clause, so the check and the write are
        // one indivisible statement.
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET \
               stock_quantity = stock_quantity + $2, \
               in_stock = CASE \
                 WHEN stock_quantity + $2 = 0 THEN false \
                 WHEN $2 > 0 THEN true \
                 ELSE in_stock END, \
               updated_at = NOW() \
             WHERE id = $1 AND stock_quantity + $2 >= 0 \
             RETURNING *",
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => row.try_into(),
            None => {
                let exists: Option<(i64,)> =
                    sqlx::query_as("SELECT 1 FROM products WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await?;
                if exists.is_some() {
                    Err(Error::InsufficientStock(id))
                } else {
                    Err(Error::NotFound("product"))
                }
            }
        }
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn insert_order(&self, order: Order) -> Result<Order> {
        let items = serde_json::to_value(&order.items)
            .map_err(|e| Error::internal(format!("serialize line items: {e}")))?;
        let address = serde_json::to_value(&order.shipping_address)
            .map_err(|e| Error::internal(format!("serialize shipping address: {e}")))?;
        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (id, order_number, customer_id, items, total_amount, \
             shipping_address, payment_method, notes, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(order.id)
        .bind(&order.order_number)
        .bind(order.customer_id)
        .bind(items)
        .bind(order.total_amount)
        .bind(address)
        .bind(&order.payment_method)
        .bind(&order.notes)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn order(&self, id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn list_orders(&self, filter: &OrderFilter, page: PageRequest) -> Result<Page<Order>> {
        let status = filter.status.map(|s| s.as_str());
        let clause = "($1::text IS NULL OR status = $1) \
             AND ($2::uuid IS NULL OR customer_id = $2)";
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT * FROM orders WHERE {clause} \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(status)
        .bind(filter.customer_id)
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM orders WHERE {clause}"))
                .bind(status)
                .bind(filter.customer_id)
                .fetch_one(&self.pool)
                .await?;
        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Order>>>()?;
        Ok(Page { items, total })
    }

    async fn set_order_status(&self, id: Uuid, status: OrderStatus) -> Result<Order> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound("order"))?;
        row.try_into()
    }
}

#[async_trait]
impl InquiryStore for PgStore {
    async fn insert_inquiry(&self, inquiry: Inquiry) -> Result<Inquiry> {
        let row = sqlx::query_as::<_, InquiryRow>(
            "INSERT INTO contacts (id, name, email, phone, subject, message, inquiry_type, \
             product_id, quantity, status, assigned_to, response, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NULL, $12, $13) RETURNING *",
        )
        .bind(inquiry.id)
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.phone)
        .bind(&inquiry.subject)
        .bind(&inquiry.message)
        .bind(inquiry.inquiry_type.as_str())
        .bind(inquiry.product_id)
        .bind(inquiry.quantity)
        .bind(inquiry.status.as_str())
        .bind(inquiry.assigned_to)
        .bind(inquiry.created_at)
        .bind(inquiry.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn inquiry(&self, id: Uuid) -> Result<Option<Inquiry>> {
        let row = sqlx::query_as::<_, InquiryRow>("SELECT * FROM contacts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn list_inquiries(
        &self,
        filter: &InquiryFilter,
        page: PageRequest,
    ) -> Result<Page<Inquiry>> {
        let status = filter.status.map(|s| s.as_str());
        let inquiry_type = filter.inquiry_type.map(|t| t.as_str());
        let clause = "($1::text IS NULL OR status = $1) \
             AND ($2::text IS NULL OR inquiry_type = $2)";
        let rows = sqlx::query_as::<_, InquiryRow>(&format!(
            "SELECT * FROM contacts WHERE {clause} \
             ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
        ))
        .bind(status)
        .bind(inquiry_type)
        .bind(page.limit as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;
        let (total,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM contacts WHERE {clause}"))
                .bind(status)
                .bind(inquiry_type)
                .fetch_one(&self.pool)
                .await?;
        let items = rows
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Inquiry>>>()?;
        Ok(Page { items, total })
    }

    async fn set_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> Result<Inquiry> {
        let row = sqlx::query_as::<_, InquiryRow>(
            "UPDATE contacts SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound("contact inquiry"))?;
        row.try_into()
    }

    async fn assign_inquiry(&self, id: Uuid, assignee: Option<Uuid>) -> Result<Inquiry> {
        let row = sqlx::query_as::<_, InquiryRow>(
            "UPDATE contacts SET assigned_to = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(assignee)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound("contact inquiry"))?;
        row.try_into()
    }

    async fn set_inquiry_response(&self, id: Uuid, response: InquiryResponse) -> Result<Inquiry> {
        let payload = serde_json::to_value(&response)
            .map_err(|e| Error::internal(format!("serialize response: {e}")))?;
        let row = sqlx::query_as::<_, InquiryRow>(
            "UPDATE contacts SET status = 'replied', response = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(payload)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NotFound("contact inquiry"))?;
        row.try_into()
    }

    async fn inquiry_stats(&self) -> Result<InquiryStats> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM contacts GROUP BY status ORDER BY status")
                .fetch_all(&self.pool)
                .await?;
        let mut breakdown = Vec::with_capacity(rows.len());
        for (status, count) in rows {
            breakdown.push(StatusCount {
                status: status.parse().map_err(Error::Internal)?,
                count,
            });
        }
        let count_of = |s: InquiryStatus| {
            breakdown
                .iter()
                .find(|c| c.status == s)
                .map_or(0, |c| c.count)
        };
        Ok(InquiryStats {
            total_contacts: breakdown.iter().map(|c| c.count).sum(),
            new_contacts: count_of(InquiryStatus::New),
            replied_contacts: count_of(InquiryStatus::Replied),
            status_breakdown: breakdown,
        })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, username, email, password, role, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::validation("username already taken")
            }
            _ => Error::Storage(e),
        })?;
        row.try_into()
    }

    async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }

    async fn insert_session(&self, session: Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token, user_id, role, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.role.as_str())
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn session(&self, token: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        row.map(TryInto::try_into).transpose()
    }
}
