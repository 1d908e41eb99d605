use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        businesses::{BusinessList, CreateBusinessRequest},
        campaigns::{CampaignList, CreateCampaignRequest, UpdateCampaignRequest},
        digital_contacts::{CreateDigitalContactRequest, DigitalContactList},
        favorites::{
            CreateFavoriteRequest, FavoriteOffer, FavoriteProduct, FavoriteResponse,
            FavoriteStore, FavoritesPage,
        },
        products::{CreateProductRequest, LinkProductRequest},
        profile_image::{ProfileImageResponse, ProfileImageUpload},
        users::RegisterUserRequest,
    },
    middleware::auth::SESSION_TOKEN_HEADER,
    models::{
        Business, Campaign, CampaignProduct, Category, DigitalContact, FavoriteKind, Product,
        Timezone, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        businesses, campaigns, categories, digital_contacts, favorites, health, products,
        profile_image, timezones, users,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(SESSION_TOKEN_HEADER))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        businesses::create_business,
        businesses::get_business,
        businesses::list_user_businesses,
        businesses::delete_business,
        campaigns::list_campaigns,
        campaigns::get_campaign,
        campaigns::create_campaign,
        campaigns::update_campaign,
        categories::list_categories,
        categories::get_category,
        categories::list_subcategories,
        digital_contacts::list_digital_contacts,
        digital_contacts::get_digital_contact,
        digital_contacts::list_business_contacts,
        digital_contacts::create_digital_contact,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        products::get_product,
        products::create_product,
        products::link_product,
        profile_image::upload_profile_image,
        timezones::list_active_timezones,
        timezones::list_all_timezones,
        users::register_user,
        users::get_user
    ),
    components(
        schemas(
            Business,
            Campaign,
            CampaignProduct,
            Category,
            DigitalContact,
            FavoriteKind,
            Product,
            Timezone,
            User,
            BusinessList,
            CreateBusinessRequest,
            CampaignList,
            CreateCampaignRequest,
            UpdateCampaignRequest,
            DigitalContactList,
            CreateDigitalContactRequest,
            CreateFavoriteRequest,
            FavoriteResponse,
            FavoriteStore,
            FavoriteProduct,
            FavoriteOffer,
            FavoritesPage,
            CreateProductRequest,
            LinkProductRequest,
            ProfileImageUpload,
            ProfileImageResponse,
            RegisterUserRequest,
            Meta,
            ApiResponse<Business>,
            ApiResponse<Campaign>,
            ApiResponse<FavoritesPage>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Businesses", description = "Stores and their owners"),
        (name = "Campaigns", description = "Offers run by businesses"),
        (name = "Categories", description = "Category tree"),
        (name = "Digital contacts", description = "Web and social contacts of a business"),
        (name = "Favorites", description = "Saved stores, products and offers"),
        (name = "Products", description = "Product endpoints"),
        (name = "Timezones", description = "Timezone reference data"),
        (name = "Users", description = "Registration and profile, proxied to the identity service"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
