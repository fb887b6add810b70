use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use valisto_core::{ConfigSnapshot, Plan, TenantContext, TenantId};

use crate::error::{SyncError, SyncResult};
use crate::store::DocumentStore;
use crate::types::{plan_of, stock_of, Document, VehicleSnapshot};

/// Collection layout for a deployment.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Per-tenant deposit product collection name
    pub products_collection: String,
    /// Per-tenant user collection name
    pub users_collection: String,
    /// Per-tenant vehicle inventory collection name
    pub vehicle_collection: String,
    /// Fixed id of the snapshot document inside the vehicle collection
    pub vehicle_doc_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            products_collection: "productos".to_string(),
            users_collection: "usuarios".to_string(),
            vehicle_collection: "inventarioVehiculo".to_string(),
            vehicle_doc_id: "actual".to_string(),
        }
    }
}

impl SyncConfig {
    /// Overlay collection names from a config snapshot (`sync.*` keys).
    pub fn from_config(config: &ConfigSnapshot) -> Self {
        let mut layout = Self::default();
        if let Some(v) = config.get_string("sync.products_collection") {
            layout.products_collection = v;
        }
        if let Some(v) = config.get_string("sync.users_collection") {
            layout.users_collection = v;
        }
        if let Some(v) = config.get_string("sync.vehicle_collection") {
            layout.vehicle_collection = v;
        }
        if let Some(v) = config.get_string("sync.vehicle_doc_id") {
            layout.vehicle_doc_id = v;
        }
        layout
    }

    pub fn tenants_path(&self) -> &'static str {
        "tenants"
    }

    pub fn products_path(&self, tenant: &TenantId) -> String {
        format!("tenants/{}/{}", tenant, self.products_collection)
    }

    pub fn users_path(&self, tenant: &TenantId) -> String {
        format!("tenants/{}/{}", tenant, self.users_collection)
    }

    pub fn vehicle_path(&self, tenant: &TenantId) -> String {
        format!("tenants/{}/{}", tenant, self.vehicle_collection)
    }
}

/// Before/after images delivered with a product update trigger.
#[derive(Debug, Clone, Default)]
pub struct DocumentChange {
    pub before: Option<Document>,
    pub after: Option<Document>,
}

impl DocumentChange {
    pub fn new(before: Option<Document>, after: Option<Document>) -> Self {
        Self { before, after }
    }
}

/// Result of a trigger-path sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Snapshot written; count of product keys touched.
    Synced { products: usize },
    /// Nothing written.
    Skipped(SkipReason),
}

/// Why a trigger-path sync wrote nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The trigger fired without a usable document image.
    MissingImage,
    /// The tenant document does not exist.
    TenantNotFound,
    /// The plan does not include automatic sync.
    PlanNotEligible(Plan),
    /// The deposit collection has no products to mirror.
    EmptyDeposit,
}

/// Result payload of an on-demand full sync.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    /// Number of products mirrored into the snapshot.
    pub productos: usize,
    /// The synced id → stock mapping. Empty when the deposit was empty.
    pub inventario: BTreeMap<String, i64>,
}

/// Inventory sync engine over a pluggable document store.
///
/// Every operation is stateless and idempotent: rerunning with the same
/// deposit contents produces the same snapshot contents. Concurrent runs
/// for the same tenant are not serialized here; the merge path touches a
/// single product key per write, so interleavings only race on the
/// informational metadata fields.
pub struct SyncEngine<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    config: SyncConfig,
}

impl<S: DocumentStore> SyncEngine<S> {
    /// Create a new engine with the default collection layout.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            config: SyncConfig::default(),
        }
    }

    /// Create an engine with a custom collection layout.
    pub fn with_config(store: S, config: SyncConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }
}

impl<S: DocumentStore + ?Sized> SyncEngine<S> {
    /// Create an engine over an already-shared store.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            config: SyncConfig::default(),
        }
    }

    pub fn from_arc_with_config(store: Arc<S>, config: SyncConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Seed the vehicle snapshot when a tenant user is created.
    ///
    /// The plan is read from the new user document itself. Writes nothing
    /// when the plan is ineligible or the deposit is empty.
    #[instrument(skip(self, user_doc), fields(tenant_id = %tenant_id, user_id = %user_id))]
    pub async fn sync_on_user_created(
        &self,
        tenant_id: &str,
        user_id: &str,
        user_doc: Option<&Document>,
    ) -> SyncResult<SyncOutcome> {
        let Some(user) = user_doc else {
            warn!("user creation fired without a document image");
            return Ok(SyncOutcome::Skipped(SkipReason::MissingImage));
        };

        let plan = plan_of(user);
        if !plan.auto_sync_eligible() {
            debug!(plan = %plan, "plan not eligible, initial sync skipped");
            return Ok(SyncOutcome::Skipped(SkipReason::PlanNotEligible(plan)));
        }

        let ctx = TenantContext::new(tenant_id).with_plan(plan);
        let products = self
            .store
            .get_collection(&self.config.products_path(&ctx.tenant_id))
            .await?;
        if products.is_empty() {
            debug!("deposit is empty, snapshot not created");
            return Ok(SyncOutcome::Skipped(SkipReason::EmptyDeposit));
        }

        let stock = stock_mapping(&products);
        let count = stock.len();
        let snapshot = VehicleSnapshot::new(stock, plan).initialized_by(user_id);
        self.write_snapshot(&ctx, snapshot).await?;
        info!(products = count, "vehicle snapshot initialized");
        Ok(SyncOutcome::Synced { products: count })
    }

    /// Mirror one product's stock into the snapshot after an update.
    ///
    /// The plan is read from the tenant document. The merge write touches
    /// only this product's key, so other entries survive a failed or
    /// concurrent sync.
    #[instrument(skip(self, change), fields(tenant_id = %tenant_id, product_id = %product_id))]
    pub async fn sync_on_product_updated(
        &self,
        tenant_id: &str,
        product_id: &str,
        change: &DocumentChange,
    ) -> SyncResult<SyncOutcome> {
        let (Some(_before), Some(after)) = (&change.before, &change.after) else {
            warn!("product update fired without before/after images");
            return Ok(SyncOutcome::Skipped(SkipReason::MissingImage));
        };

        let tenant_doc = self
            .store
            .get_document(self.config.tenants_path(), tenant_id)
            .await?;
        let Some(tenant_doc) = tenant_doc else {
            warn!("tenant document missing, stock mirror skipped");
            return Ok(SyncOutcome::Skipped(SkipReason::TenantNotFound));
        };

        let plan = plan_of(&tenant_doc);
        if !plan.auto_sync_eligible() {
            debug!(plan = %plan, "plan not eligible, stock mirror skipped");
            return Ok(SyncOutcome::Skipped(SkipReason::PlanNotEligible(plan)));
        }

        let stock = stock_of(after);
        let ctx = TenantContext::new(tenant_id).with_plan(plan);
        let mut single = BTreeMap::new();
        single.insert(product_id.to_string(), stock);
        let fields = VehicleSnapshot::new(single, plan).to_document();
        self.merge_snapshot(&ctx, fields).await?;
        info!(stock, "product stock mirrored into vehicle snapshot");
        Ok(SyncOutcome::Synced { products: 1 })
    }

    /// Full resync of every deposit product into the vehicle snapshot.
    ///
    /// Unlike the trigger paths, ineligibility here is a hard error: the
    /// caller asked for a sync and gets a definitive answer. The plan is
    /// read from the first user document whose `tenantId` field matches.
    #[instrument(skip(self), fields(tenant_id = %tenant_id))]
    pub async fn sync_on_demand(&self, tenant_id: &str) -> SyncResult<SyncReport> {
        if tenant_id.trim().is_empty() {
            return Err(SyncError::MissingTenantId);
        }

        let tenant = TenantId(tenant_id.to_string());
        let users = self
            .store
            .get_collection(&self.config.users_path(&tenant))
            .await?;
        let user = users
            .into_iter()
            .find(|(_, doc)| doc.get("tenantId").and_then(Value::as_str) == Some(tenant_id));
        let Some((_, user_doc)) = user else {
            return Err(SyncError::UserNotFound(tenant_id.to_string()));
        };

        let plan = plan_of(&user_doc);
        if !plan.auto_sync_eligible() {
            return Err(SyncError::PlanNotEligible(plan));
        }

        let ctx = TenantContext::new(tenant_id).with_plan(plan);
        let products = self
            .store
            .get_collection(&self.config.products_path(&ctx.tenant_id))
            .await?;
        if products.is_empty() {
            info!("deposit is empty, nothing to sync");
            return Ok(SyncReport {
                productos: 0,
                inventario: BTreeMap::new(),
            });
        }

        let stock = stock_mapping(&products);
        let report = SyncReport {
            productos: stock.len(),
            inventario: stock.clone(),
        };
        let snapshot = VehicleSnapshot::new(stock, plan).manual();
        self.write_snapshot(&ctx, snapshot).await?;
        info!(products = report.productos, "vehicle snapshot rebuilt on demand");
        Ok(report)
    }

    /// Full-replace snapshot write.
    async fn write_snapshot(
        &self,
        ctx: &TenantContext,
        snapshot: VehicleSnapshot,
    ) -> SyncResult<()> {
        self.store
            .set_document(
                &self.config.vehicle_path(&ctx.tenant_id),
                &self.config.vehicle_doc_id,
                snapshot.to_document(),
            )
            .await?;
        Ok(())
    }

    /// Field-level snapshot merge; unrelated product keys are preserved.
    async fn merge_snapshot(&self, ctx: &TenantContext, fields: Document) -> SyncResult<()> {
        self.store
            .merge_document(
                &self.config.vehicle_path(&ctx.tenant_id),
                &self.config.vehicle_doc_id,
                fields,
            )
            .await?;
        Ok(())
    }
}

fn stock_mapping(products: &[(String, Document)]) -> BTreeMap<String, i64> {
    products
        .iter()
        .map(|(id, doc)| (id.clone(), stock_of(doc)))
        .collect()
}
