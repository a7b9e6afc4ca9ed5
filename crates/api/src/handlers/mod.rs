pub mod cta_banners;
