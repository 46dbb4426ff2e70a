//! Read side for confirmed orders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::clients::{BarberDirectory, Deadline, PaymentGateway};
use crate::domain::order::HairColorBrief;
use crate::domain::schedule::{format_order_time, format_schedule};
use crate::domain::{
    EnrichedOrder, Order, OrderFilter, OrderSummary, Page, PageMeta, PageRequest, PaymentRecord,
    SortDirection, UserRef,
};
use crate::error::BookingError;
use crate::persistence::OrderRepository;

/// Parameters of an order list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOrdersRequest {
    /// Owner of the listed orders.
    pub user: UserRef,
    /// Requested items per page. Queries use at most 100; the requested
    /// value is echoed in the page metadata.
    pub items: u32,
    /// Requested page number, 1-indexed. Echoed as requested.
    pub page: u32,
    /// Raw sort direction, `asc` or `desc`.
    pub sort_by: Option<String>,
    /// Free-text search; `BBSOD<id>` restricts to one order.
    pub code_or_hair_style: Option<String>,
}

/// Loads persisted orders and joins in payment and live barber data.
#[derive(Debug, Clone)]
pub struct OrderQueryService {
    orders: Arc<dyn OrderRepository>,
    barbers: Arc<dyn BarberDirectory>,
    payments: Arc<dyn PaymentGateway>,
    deadline: Deadline,
}

impl OrderQueryService {
    /// Creates a query service.
    #[must_use]
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        barbers: Arc<dyn BarberDirectory>,
        payments: Arc<dyn PaymentGateway>,
        deadline: Deadline,
    ) -> Self {
        Self {
            orders,
            barbers,
            payments,
            deadline,
        }
    }

    /// Loads one order with its payment and the barber's current avatar.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidId`] for a non-numeric or non-positive
    /// id, [`BookingError::OrderNotFound`] if no order matches,
    /// [`BookingError::IntegrityViolation`] if the payment service has no
    /// payment for it, or a gateway or persistence error.
    pub async fn get_order(
        &self,
        raw_id: &str,
        user: UserRef,
    ) -> Result<EnrichedOrder, BookingError> {
        let id = parse_order_id(raw_id)?;

        let order = self
            .deadline
            .bound("order repository", self.orders.find_order(id))
            .await?
            .ok_or(BookingError::OrderNotFound(id))?;

        let payments = self.fetch_payments(&[id]).await?;
        let payment = payment_for(&payments, id)?;

        let live = self
            .deadline
            .bound("barber directory", self.barbers.get_barber(order.barber.id))
            .await?;

        let mut barber = order.barber;
        barber.avatar = live.avatar;

        Ok(EnrichedOrder {
            id: order.id,
            amount: payment.amount,
            status: payment.status.clone(),
            payment_type: payment.payment_type.clone(),
            cutted: order.cutted,
            schedule: format_schedule(order.schedule),
            order_time: format_order_time(order.order_time),
            user,
            barber,
            hair_style: order.hair_style,
            hair_color: order.hair_color,
        })
    }

    /// Loads one page of the user's orders as summaries.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidSortBy`] before touching the database
    /// if the sort direction is not `asc` or `desc`,
    /// [`BookingError::IntegrityViolation`] if a listed order has no payment,
    /// or a gateway or persistence error.
    pub async fn list_orders(
        &self,
        request: &ListOrdersRequest,
    ) -> Result<Page<OrderSummary>, BookingError> {
        let sort = SortDirection::parse(request.sort_by.as_deref())?;
        let filter =
            OrderFilter::from_search(request.user.id, request.code_or_hair_style.as_deref());
        let page = PageRequest::clamped(request.items, request.page, sort);

        let orders = self
            .deadline
            .bound("order repository", self.orders.list_orders(&filter, &page))
            .await?;

        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let payments = if ids.is_empty() {
            Vec::new()
        } else {
            self.fetch_payments(&ids).await?
        };
        let by_order: HashMap<i32, &PaymentRecord> =
            payments.iter().map(|p| (p.order_id, p)).collect();

        let data = orders
            .into_iter()
            .map(|order| {
                let payment = by_order
                    .get(&order.id)
                    .copied()
                    .ok_or_else(|| missing_payment(order.id))?;
                Ok(summarize(order, payment))
            })
            .collect::<Result<Vec<_>, BookingError>>()?;

        let total_records = self
            .deadline
            .bound("order repository", self.orders.count_orders(&filter))
            .await?;

        Ok(Page {
            data,
            meta: PageMeta {
                items: request.items,
                page: request.page,
                total_records,
            },
        })
    }

    async fn fetch_payments(&self, ids: &[i32]) -> Result<Vec<PaymentRecord>, BookingError> {
        Ok(self
            .deadline
            .bound("payment service", self.payments.payments_by_order_ids(ids))
            .await?)
    }
}

/// Parses a path order id.
///
/// # Errors
///
/// Returns [`BookingError::InvalidId`] if `raw` is not an integer or is not
/// positive.
pub fn parse_order_id(raw: &str) -> Result<i32, BookingError> {
    let id: i32 = raw
        .parse()
        .map_err(|_| BookingError::InvalidId("Order id must be integer".to_string()))?;
    if id <= 0 {
        return Err(BookingError::InvalidId(
            "Order id must be greater than 0".to_string(),
        ));
    }
    Ok(id)
}

fn payment_for(payments: &[PaymentRecord], order_id: i32) -> Result<&PaymentRecord, BookingError> {
    payments
        .iter()
        .find(|p| p.order_id == order_id)
        .ok_or_else(|| missing_payment(order_id))
}

fn missing_payment(order_id: i32) -> BookingError {
    BookingError::IntegrityViolation(format!("no payment recorded for order {order_id}"))
}

fn summarize(order: Order, payment: &PaymentRecord) -> OrderSummary {
    OrderSummary {
        id: order.id,
        hair_style: order.hair_style.name,
        hair_color: order.hair_color.map(|c| HairColorBrief {
            color_code: c.color_code,
            color: c.color,
        }),
        order_time: format_order_time(order.order_time),
        payment_type: payment.payment_type.clone(),
        amount: payment.amount,
    }
}
