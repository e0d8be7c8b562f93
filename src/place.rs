//! Place records and category tags
//!
//! A [`PlaceRecord`] is the normalized form of a point of interest returned by
//! a places lookup, independent of the wire format the gateway speaks.

use crate::error::TourError;
use crate::types::PlaceId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are finite and within their valid ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

macro_rules! place_types {
    ($($variant:ident => $tag:literal),+ $(,)?) => {
        /// Category tags offered as nearby-search filters
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum PlaceType {
            $($variant),+
        }

        impl PlaceType {
            pub const ALL: &'static [PlaceType] = &[$(PlaceType::$variant),+];

            /// Tag as used by the Places service
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(PlaceType::$variant => $tag),+
                }
            }
        }

        impl FromStr for PlaceType {
            type Err = TourError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok(PlaceType::$variant),)+
                    other => Err(TourError::InvalidInput(format!(
                        "unknown place type '{}'",
                        other
                    ))),
                }
            }
        }
    };
}

place_types! {
    ArtGallery => "art_gallery",
    ArtStudio => "art_studio",
    CulturalLandmark => "cultural_landmark",
    HistoricalPlace => "historical_place",
    Monument => "monument",
    Museum => "museum",
    Sculpture => "sculpture",
    AmusementPark => "amusement_park",
    BotanicalGarden => "botanical_garden",
    HikingArea => "hiking_area",
    HistoricalLandmark => "historical_landmark",
    NationalPark => "national_park",
    Park => "park",
    TouristAttraction => "tourist_attraction",
    Bakery => "bakery",
    Bar => "bar",
    BarAndGrill => "bar_and_grill",
    Cafe => "cafe",
    Cafeteria => "cafeteria",
    FastFoodRestaurant => "fast_food_restaurant",
    FineDiningRestaurant => "fine_dining_restaurant",
    PizzaRestaurant => "pizza_restaurant",
    Pub => "pub",
    Restaurant => "restaurant",
    ClothingStore => "clothing_store",
    GiftShop => "gift_shop",
    JewelryStore => "jewelry_store",
    Market => "market",
    ShoeStore => "shoe_store",
    ShoppingMall => "shopping_mall",
    SportingGoodsStore => "sporting_goods_store",
    Store => "store",
}

impl fmt::Display for PlaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized point of interest.
///
/// Within a session `display_name` is treated as the primary key: two records
/// with the same display name are the same place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub id: PlaceId,
    pub display_name: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Category tags as reported by the service, in service order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl PlaceRecord {
    /// Create a record with only the required fields set
    pub fn new(id: impl Into<PlaceId>, display_name: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            location,
            address: None,
            rating: None,
            user_rating_count: None,
            website: None,
            phone_number: None,
            types: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Add a category tag, keeping tags unique
    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.types.contains(&tag) {
            self.types.push(tag);
        }
        self
    }

    pub fn has_type(&self, place_type: PlaceType) -> bool {
        self.types.iter().any(|t| t == place_type.as_str())
    }

    /// Multi-line description consumed by the narration component.
    ///
    /// Optional fields that are absent produce no line at all.
    pub fn structured_summary(&self) -> String {
        let mut out = format!("Display Name: {}\n", self.display_name);
        if let Some(address) = &self.address {
            out.push_str(&format!("Address: {}\n", address));
        }
        if let Some(rating) = self.rating {
            out.push_str(&format!("Rating: {}\n", rating));
        }
        if let Some(website) = &self.website {
            out.push_str(&format!("Website: {}\n", website));
        }
        if let Some(phone_number) = &self.phone_number {
            out.push_str(&format!("Phone number: {}\n", phone_number));
        }
        if !self.types.is_empty() {
            out.push_str(&format!("Types: {}\n", self.types.join(", ")));
        }
        out
    }
}
