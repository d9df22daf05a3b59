use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    domain::catalogue::{CatalogueAnalytics, CatalogueView, CategorySummary, SortMode},
    dto::{
        auth::{
            LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, RegisterResponse,
            UpdateFaceRequest, UpdatePasswordRequest,
        },
        cart::{AddToCartRequest, CartList, UpdateCartItemRequest},
        catalogue::{CreateCatalogueItemRequest, ImportSummary, UpdateCatalogueItemRequest},
        jobs::{CreateJobRequest, JobList, UpdateJobRequest},
        orders::{CheckoutRequest, OrderList, UpdateOrderStatusRequest},
        rewards::{AddPurchaseRequest, CreateCustomerRequest, CustomerList, CustomerRewards},
        support::{
            ArticleList, CreateTicketRequest, FaqList, StatusList, TicketList,
            UpdateTicketStatusRequest,
        },
    },
    models::{
        CartItem, CatalogueItem, DeliveryDetails, Faq, JobCard, KbArticle, Order, OrderStatus,
        Role, StatusUpdate, SupportTicket, TicketStatus, UserProfile,
    },
    response::{ApiResponse, Meta},
    routes::{auth, cart, catalogue, health, jobs, orders, params, rewards, support},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::logout,
        auth::profile,
        auth::update_password,
        auth::update_face,
        jobs::list_jobs,
        jobs::get_job,
        jobs::create_job,
        jobs::update_job,
        jobs::delete_job,
        rewards::list_customers,
        rewards::get_customer,
        rewards::create_customer,
        rewards::add_purchase,
        rewards::redeem,
        rewards::delete_customer,
        catalogue::query_catalogue,
        catalogue::get_item,
        catalogue::create_item,
        catalogue::update_item,
        catalogue::delete_item,
        catalogue::export_catalogue,
        catalogue::import_catalogue,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_cart_item,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        orders::update_order_status,
        support::list_faqs,
        support::list_articles,
        support::list_status,
        support::create_ticket,
        support::list_tickets,
        support::get_ticket,
        support::update_ticket_status
    ),
    components(
        schemas(
            Role,
            UserProfile,
            JobCard,
            CatalogueItem,
            CartItem,
            Order,
            OrderStatus,
            DeliveryDetails,
            SupportTicket,
            TicketStatus,
            Faq,
            KbArticle,
            StatusUpdate,
            RegisterRequest,
            RegisterResponse,
            LoginRequest,
            LoginResponse,
            ProfileResponse,
            UpdatePasswordRequest,
            UpdateFaceRequest,
            CreateJobRequest,
            UpdateJobRequest,
            JobList,
            CreateCustomerRequest,
            AddPurchaseRequest,
            CustomerRewards,
            CustomerList,
            SortMode,
            CatalogueView,
            CatalogueAnalytics,
            CategorySummary,
            CreateCatalogueItemRequest,
            UpdateCatalogueItemRequest,
            ImportSummary,
            AddToCartRequest,
            UpdateCartItemRequest,
            CartList,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            CreateTicketRequest,
            UpdateTicketStatusRequest,
            TicketList,
            FaqList,
            ArticleList,
            StatusList,
            params::CatalogueQuery,
            params::FaqQuery,
            params::ArticleQuery,
            params::TicketQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<CatalogueView>,
            ApiResponse<CustomerRewards>,
            ApiResponse<LoginResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration, login and profile"),
        (name = "Jobs", description = "Workshop job cards"),
        (name = "Rewards", description = "Customer purchase rewards"),
        (name = "Catalogue", description = "Parts catalogue, search and CSV transfer"),
        (name = "Cart", description = "Shared shopping cart"),
        (name = "Orders", description = "Checkout and orders"),
        (name = "Support", description = "FAQs, articles, service status and tickets"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
