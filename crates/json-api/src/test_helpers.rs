//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use bookshelf_app::{
    auth::{AuthenticatedUser, MockAuthService},
    context::AppContext,
    domain::{
        addresses::{
            MockAddressesService,
            records::{AddressRecord, AddressUuid},
        },
        books::{
            MockBooksService,
            records::{BookRecord, BookUuid},
        },
        carts::MockCartsService,
        categories::{
            MockCategoriesService,
            records::{CategoryRecord, CategoryUuid},
        },
        orders::{
            MockOrdersService,
            records::{
                OrderDetails, OrderItemRecord, OrderRecord, OrderStatus, OrderUuid,
                PaymentProvider, ShippingAddress,
            },
        },
        users::{
            MockUsersService,
            records::{Role, UserUuid},
        },
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: AuthenticatedUser = AuthenticatedUser {
    uuid: UserUuid::from_uuid(Uuid::from_u128(1)),
    role: Role::User,
};

pub(crate) const TEST_ADMIN: AuthenticatedUser = AuthenticatedUser {
    uuid: UserUuid::from_uuid(Uuid::from_u128(2)),
    role: Role::Admin,
};

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user(TEST_CUSTOMER);
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user(TEST_ADMIN);
    ctrl.call_next(req, depot, res).await;
}

/// Service mocks backing a test [`State`]. Mocks without expectations fail
/// on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub users: MockUsersService,
    pub auth: MockAuthService,
    pub categories: MockCategoriesService,
    pub books: MockBooksService,
    pub addresses: MockAddressesService,
    pub carts: MockCartsService,
    pub orders: MockOrdersService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::shared(AppContext {
            users: Arc::new(self.users),
            auth: Arc::new(self.auth),
            categories: Arc::new(self.categories),
            books: Arc::new(self.books),
            addresses: Arc::new(self.addresses),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
        })
    }

    /// Serve `route` as the customer.
    pub(crate) fn customer_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_customer)
                .push(route),
        )
    }

    /// Serve `route` as an admin.
    pub(crate) fn admin_service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_admin)
                .push(route),
        )
    }

    /// Serve `route` without an authenticated user.
    pub(crate) fn public_service(self, route: Router) -> Service {
        Service::new(Router::new().hoop(inject(self.into_state())).push(route))
    }
}

pub(crate) fn make_category(uuid: CategoryUuid, name: &str) -> CategoryRecord {
    CategoryRecord {
        uuid,
        name: name.to_string(),
        owner_uuid: TEST_ADMIN.uuid,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_book(uuid: BookUuid, price: u64, stock: u32) -> BookRecord {
    BookRecord {
        uuid,
        title: "The Rust Programming Language".to_string(),
        author: "Steve Klabnik".to_string(),
        description: "An introduction to Rust.".to_string(),
        price,
        stock,
        category_uuid: CategoryUuid::from_uuid(Uuid::from_u128(10)),
        main_image_url: "http://localhost/images/cover.png".to_string(),
        sub_image_urls: Vec::new(),
        average_rating: 0.0,
        owner_uuid: TEST_ADMIN.uuid,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_address(uuid: AddressUuid) -> AddressRecord {
    AddressRecord {
        uuid,
        owner_uuid: TEST_CUSTOMER.uuid,
        address_line1: "221B Baker Street".to_string(),
        address_line2: String::new(),
        city: "Mumbai".to_string(),
        state: "Maharashtra".to_string(),
        country: "India".to_string(),
        pincode: "400001".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid, status: OrderStatus) -> OrderRecord {
    let paid = !matches!(status, OrderStatus::Pending);

    OrderRecord {
        uuid,
        customer_uuid: TEST_CUSTOMER.uuid,
        address: ShippingAddress {
            address_line1: "221B Baker Street".to_string(),
            address_line2: String::new(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            country: "India".to_string(),
            pincode: "400001".to_string(),
        },
        order_price: 1_000,
        discounted_order_price: 1_000,
        status,
        payment_provider: PaymentProvider::Razorpay,
        payment_session_id: "order_test_123".to_string(),
        provider_payment_id: paid.then(|| "pay_test_123".to_string()),
        is_payment_done: paid,
        paid_at: paid.then_some(Timestamp::UNIX_EPOCH),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order_details(uuid: OrderUuid, status: OrderStatus) -> OrderDetails {
    OrderDetails {
        order: make_order(uuid, status),
        items: vec![OrderItemRecord {
            book_uuid: BookUuid::from_uuid(Uuid::from_u128(20)),
            title: "The Rust Programming Language".to_string(),
            main_image_url: "http://localhost/images/cover.png".to_string(),
            quantity: 2,
            unit_price: 500,
        }],
    }
}
