pub use super::cast_member::Entity as CastMember;
pub use super::country::Entity as Country;
pub use super::director::Entity as Director;
pub use super::genre::Entity as Genre;
pub use super::title::Entity as Title;
pub use super::title_cast_member::Entity as TitleCastMember;
pub use super::title_country::Entity as TitleCountry;
pub use super::title_director::Entity as TitleDirector;
pub use super::title_genre::Entity as TitleGenre;
