//! In-process collaborator fakes shared by service and handler tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::app_state::AppState;
use crate::clients::{
    BarberDirectory, BlockTimeService, CollaboratorError, Deadline, HairColorCatalog,
    HairStyleCatalog, PaymentGateway,
};
use crate::domain::schedule::now_in_shop;
use crate::domain::{
    BarberSnapshot, BookingStatus, BookingToken, Discount, DiscountUnit, HairColorSnapshot,
    HairStyleSnapshot, InMemoryStagingStore, NewOrder, Order, OrderFilter, PageRequest,
    PaymentRecord, PaymentType, SortDirection, StagingStore,
};
use crate::error::BookingError;
use crate::persistence::OrderRepository;
use crate::service::{
    AvailabilityResolver, BookingService, ConfirmationService, OrderQueryService, PricingEngine,
    ValidationPipeline,
};

pub(crate) const TEST_DEADLINE: Deadline = Deadline::new(Duration::from_secs(5));

/// Shop-local date `offset_days` away from today, as `yyyy-MM-dd`.
pub(crate) fn shop_date(offset_days: i64) -> String {
    (now_in_shop().date_naive() + chrono::Duration::days(offset_days))
        .format("%Y-%m-%d")
        .to_string()
}

pub(crate) fn barber(id: i32, active: bool) -> BarberSnapshot {
    BarberSnapshot {
        id,
        name: format!("Barber {id}"),
        avatar: format!("barber-{id}.png"),
        active,
    }
}

pub(crate) fn style(id: i32, price: i64, discount: Option<Discount>) -> HairStyleSnapshot {
    HairStyleSnapshot {
        id,
        name: format!("Style {id}"),
        price,
        active: true,
        discount,
    }
}

pub(crate) fn color(id: i32, price: i64) -> HairColorSnapshot {
    HairColorSnapshot {
        id,
        color: format!("Color {id}"),
        price,
        active: true,
        color_code: format!("#00000{id}"),
    }
}

pub(crate) fn percent(value: i64) -> Option<Discount> {
    Some(Discount {
        unit: DiscountUnit::Percentage,
        value,
    })
}

pub(crate) fn fixed(value: i64) -> Option<Discount> {
    Some(Discount {
        unit: DiscountUnit::Fixed,
        value,
    })
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeBlockTimes {
    pub blocked: Vec<(String, String)>,
    pub calls: AtomicUsize,
    pub delay: Option<Duration>,
}

impl FakeBlockTimes {
    pub(crate) fn blocking(date: &str, time: &str) -> Self {
        Self {
            blocked: vec![(date.to_string(), time.to_string())],
            ..Self::default()
        }
    }
}

#[async_trait]
impl BlockTimeService for FakeBlockTimes {
    async fn is_blocked(&self, date: &str, time: &str) -> Result<bool, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        Ok(self.blocked.iter().any(|(d, t)| d == date && t == time))
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeBarberDirectory {
    pub barbers: Vec<BarberSnapshot>,
    pub fail: bool,
    pub list_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

impl FakeBarberDirectory {
    pub(crate) fn new(barbers: Vec<BarberSnapshot>) -> Self {
        Self {
            barbers,
            ..Self::default()
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BarberDirectory for FakeBarberDirectory {
    async fn list_barbers(&self) -> Result<Vec<BarberSnapshot>, CollaboratorError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CollaboratorError::Transport("connection refused".to_string()));
        }
        Ok(self.barbers.clone())
    }

    async fn get_barber(&self, id: i32) -> Result<BarberSnapshot, CollaboratorError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CollaboratorError::Transport("connection refused".to_string()));
        }
        self.barbers
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("barber {id}")))
    }
}

/// Serves both catalogs from in-memory maps.
#[derive(Debug, Default)]
pub(crate) struct FakeCatalog {
    pub styles: HashMap<i32, HairStyleSnapshot>,
    pub colors: HashMap<i32, HairColorSnapshot>,
    pub failure: Option<CollaboratorError>,
    pub delay: Option<Duration>,
    pub style_calls: AtomicUsize,
    pub color_calls: AtomicUsize,
}

impl FakeCatalog {
    pub(crate) fn new(styles: Vec<HairStyleSnapshot>, colors: Vec<HairColorSnapshot>) -> Self {
        Self {
            styles: styles.into_iter().map(|s| (s.id, s)).collect(),
            colors: colors.into_iter().map(|c| (c.id, c)).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl HairStyleCatalog for FakeCatalog {
    async fn get_hair_style(&self, id: i32) -> Result<HairStyleSnapshot, CollaboratorError> {
        self.style_calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.styles
            .get(&id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("hair style {id}")))
    }
}

#[async_trait]
impl HairColorCatalog for FakeCatalog {
    async fn get_hair_color(&self, id: i32) -> Result<HairColorSnapshot, CollaboratorError> {
        self.color_calls.fetch_add(1, Ordering::SeqCst);
        pause(self.delay).await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.colors
            .get(&id)
            .cloned()
            .ok_or_else(|| CollaboratorError::NotFound(format!("hair color {id}")))
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakePaymentGateway {
    pub payments: Vec<PaymentRecord>,
    pub fail_initiate: bool,
    pub initiated: Mutex<Vec<(BookingToken, PaymentType, i64)>>,
    pub batches: Mutex<Vec<Vec<i32>>>,
}

impl FakePaymentGateway {
    pub(crate) fn with_payments(payments: Vec<PaymentRecord>) -> Self {
        Self {
            payments,
            ..Self::default()
        }
    }

    pub(crate) async fn initiate_calls(&self) -> usize {
        self.initiated.lock().await.len()
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn initiate(
        &self,
        token: BookingToken,
        payment_type: PaymentType,
        amount: i64,
    ) -> Result<String, CollaboratorError> {
        self.initiated.lock().await.push((token, payment_type, amount));
        if self.fail_initiate {
            return Err(CollaboratorError::Rejected("provider declined".to_string()));
        }
        Ok(format!("https://pay.test/{token}"))
    }

    async fn payments_by_order_ids(
        &self,
        order_ids: &[i32],
    ) -> Result<Vec<PaymentRecord>, CollaboratorError> {
        self.batches.lock().await.push(order_ids.to_vec());
        Ok(self
            .payments
            .iter()
            .filter(|p| order_ids.contains(&p.order_id))
            .cloned()
            .collect())
    }
}

pub(crate) fn payment(order_id: i32, amount: i64) -> PaymentRecord {
    PaymentRecord {
        order_id,
        payment_type: "VNPAY".to_string(),
        amount,
        status: "SUCCESS".to_string(),
    }
}

/// Orders held in memory, mirroring the repository contract.
#[derive(Debug, Default)]
pub(crate) struct FakeOrderRepository {
    busy: Mutex<Vec<(i32, DateTime<Utc>)>>,
    orders: Mutex<Vec<(BookingToken, Order)>>,
    free_barber_queries: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
}

impl FakeOrderRepository {
    pub(crate) async fn mark_busy(&self, barber_id: i32, schedule: DateTime<Utc>) {
        self.busy.lock().await.push((barber_id, schedule));
    }

    pub(crate) async fn seed(&self, order: Order) {
        self.orders.lock().await.push((BookingToken::generate(), order));
    }

    pub(crate) async fn order_count(&self) -> usize {
        self.orders.lock().await.len()
    }

    pub(crate) fn free_barber_queries(&self) -> usize {
        self.free_barber_queries.load(Ordering::SeqCst)
    }

    fn matches(filter: &OrderFilter, order: &Order) -> bool {
        order.user_id == filter.user_id && filter.order_id.is_none_or(|id| id == order.id)
    }
}

#[async_trait]
impl OrderRepository for FakeOrderRepository {
    async fn find_barber_ids(
        &self,
        candidates: &[i32],
        schedule: DateTime<Utc>,
    ) -> Result<Vec<i32>, BookingError> {
        self.free_barber_queries.fetch_add(1, Ordering::SeqCst);
        let busy = self.busy.lock().await;
        Ok(candidates
            .iter()
            .copied()
            .filter(|id| !busy.iter().any(|(b, s)| b == id && *s == schedule))
            .collect())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<i32, BookingError> {
        let mut orders = self.orders.lock().await;
        if let Some((_, existing)) = orders.iter().find(|(t, _)| *t == order.booking_token) {
            return Ok(existing.id);
        }
        let id = orders.iter().map(|(_, o)| o.id).max().unwrap_or(0) + 1;
        orders.push((
            order.booking_token,
            Order {
                id,
                user_id: order.user_id,
                schedule: order.schedule,
                barber: order.barber.clone(),
                hair_style: order.hair_style.clone(),
                hair_color: order.hair_color.clone(),
                order_time: order.order_time,
                cutted: order.cutted,
            },
        ));
        Ok(id)
    }

    async fn find_order_id_by_token(
        &self,
        token: BookingToken,
    ) -> Result<Option<i32>, BookingError> {
        let orders = self.orders.lock().await;
        Ok(orders.iter().find(|(t, _)| *t == token).map(|(_, o)| o.id))
    }

    async fn find_order(&self, id: i32) -> Result<Option<Order>, BookingError> {
        let orders = self.orders.lock().await;
        Ok(orders.iter().find(|(_, o)| o.id == id).map(|(_, o)| o.clone()))
    }

    async fn list_orders(
        &self,
        filter: &OrderFilter,
        page: &PageRequest,
    ) -> Result<Vec<Order>, BookingError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let orders = self.orders.lock().await;
        let mut matching: Vec<Order> = orders
            .iter()
            .filter(|(_, o)| Self::matches(filter, o))
            .map(|(_, o)| o.clone())
            .collect();
        matching.sort_by_key(|o| (o.order_time, o.id));
        if page.sort == SortDirection::Desc {
            matching.reverse();
        }
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = usize::try_from(page.items).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(items).collect())
    }

    async fn count_orders(&self, filter: &OrderFilter) -> Result<i64, BookingError> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let orders = self.orders.lock().await;
        let count = orders.iter().filter(|(_, o)| Self::matches(filter, o)).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }
}

/// Wires every fake into real service components.
///
/// Default data: barbers 1 and 2 (active), style 1 priced 200 with 10% off,
/// style 2 priced 150 with 20 off, color 3 priced 30.
#[derive(Debug)]
pub(crate) struct Harness {
    pub block_times: Arc<FakeBlockTimes>,
    pub barbers: Arc<FakeBarberDirectory>,
    pub catalog: Arc<FakeCatalog>,
    pub payments: Arc<FakePaymentGateway>,
    pub orders: Arc<FakeOrderRepository>,
    pub staging: Arc<InMemoryStagingStore>,
    pub staged_status: BookingStatus,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            block_times: Arc::new(FakeBlockTimes::default()),
            barbers: Arc::new(FakeBarberDirectory::new(vec![barber(1, true), barber(2, true)])),
            catalog: Arc::new(FakeCatalog::new(
                vec![style(1, 200, percent(10)), style(2, 150, fixed(20))],
                vec![color(3, 30)],
            )),
            payments: Arc::new(FakePaymentGateway::default()),
            orders: Arc::new(FakeOrderRepository::default()),
            staging: Arc::new(InMemoryStagingStore::new()),
            staged_status: BookingStatus::Success,
        }
    }

    pub(crate) fn booking_service(&self) -> BookingService {
        let validation = ValidationPipeline::new(
            Arc::clone(&self.block_times) as Arc<dyn BlockTimeService>,
            TEST_DEADLINE,
        );
        let availability = AvailabilityResolver::new(
            Arc::clone(&self.barbers) as Arc<dyn BarberDirectory>,
            Arc::clone(&self.orders) as Arc<dyn OrderRepository>,
            TEST_DEADLINE,
        );
        let pricing = PricingEngine::new(
            Arc::clone(&self.catalog) as Arc<dyn HairStyleCatalog>,
            Arc::clone(&self.catalog) as Arc<dyn HairColorCatalog>,
            TEST_DEADLINE,
        );
        BookingService::new(
            validation,
            availability,
            pricing,
            Arc::clone(&self.staging) as Arc<dyn StagingStore>,
            Arc::clone(&self.payments) as Arc<dyn PaymentGateway>,
            TEST_DEADLINE,
            self.staged_status,
        )
    }

    pub(crate) fn order_query(&self) -> OrderQueryService {
        OrderQueryService::new(
            Arc::clone(&self.orders) as Arc<dyn OrderRepository>,
            Arc::clone(&self.barbers) as Arc<dyn BarberDirectory>,
            Arc::clone(&self.payments) as Arc<dyn PaymentGateway>,
            TEST_DEADLINE,
        )
    }

    pub(crate) fn confirmation(&self) -> ConfirmationService {
        ConfirmationService::new(
            Arc::clone(&self.staging) as Arc<dyn StagingStore>,
            Arc::clone(&self.orders) as Arc<dyn OrderRepository>,
            TEST_DEADLINE,
        )
    }

    pub(crate) fn app_state(&self) -> AppState {
        AppState {
            booking_service: Arc::new(self.booking_service()),
            order_query: Arc::new(self.order_query()),
            confirmation: Arc::new(self.confirmation()),
        }
    }
}
