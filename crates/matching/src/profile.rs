//! Viewer-dependent representation of a user profile.
//!
//! Users see their own profile in full, and so do administrators. Everybody
//! else gets a public view, which never contains internal fields and contains
//! an optional attribute only if its owner marked it as shown.

use std::collections::BTreeMap;

use db::{user, ActiveValue, PrimitiveDateTime};
use serde::{Deserialize, Serialize};

use crate::Actor;

/// Optional profile attribute, hidden from other users unless shown explicitly.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    YearOfBirth,
    BodyType,
    Diet,
    Drinks,
    Drugs,
    Education,
    Ethnicity,
    Height,
    Income,
    Job,
    Location,
    Offspring,
    Pets,
    Sign,
    Smokes,
    Speaks,
    Email,
    PhoneNumber,
}

impl ProfileField {
    pub const ALL: [ProfileField; 18] = [
        ProfileField::YearOfBirth,
        ProfileField::BodyType,
        ProfileField::Diet,
        ProfileField::Drinks,
        ProfileField::Drugs,
        ProfileField::Education,
        ProfileField::Ethnicity,
        ProfileField::Height,
        ProfileField::Income,
        ProfileField::Job,
        ProfileField::Location,
        ProfileField::Offspring,
        ProfileField::Pets,
        ProfileField::Sign,
        ProfileField::Smokes,
        ProfileField::Speaks,
        ProfileField::Email,
        ProfileField::PhoneNumber,
    ];

    /// Bit of the field inside of [`ShownFields`].
    ///
    /// Bit positions are persisted, thus new fields must only be appended.
    fn bit(self) -> i32 {
        1 << self as u32
    }
}

/// Set of profile attributes a user agreed to show to other users.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ShownFields(i32);

impl ShownFields {
    pub fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> i32 {
        self.0
    }

    pub fn contains(self, field: ProfileField) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn set(&mut self, field: ProfileField, shown: bool) {
        if shown {
            self.0 |= field.bit();
        } else {
            self.0 &= !field.bit();
        }
    }

    /// Apply partial changes, keeping fields that were not mentioned.
    pub fn apply(mut self, changes: &BTreeMap<ProfileField, bool>) -> Self {
        for (&field, &shown) in changes {
            self.set(field, shown);
        }

        self
    }

    /// Visibility of every known field.
    pub fn to_map(self) -> BTreeMap<ProfileField, bool> {
        ProfileField::ALL
            .into_iter()
            .map(|field| (field, self.contains(field)))
            .collect()
    }

    /// Return the value only if the field is shown.
    fn reveal<T>(self, field: ProfileField, value: Option<T>) -> Option<T> {
        value.filter(|_| self.contains(field))
    }
}

/// User profile as seen by a particular viewer.
///
/// Absent fields are either empty or hidden from the viewer, these two cases
/// are indistinguishable on purpose.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<user::Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_activated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biographic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drinks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drugs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethnicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offspring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smokes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaks: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shown_fields: Option<BTreeMap<ProfileField, bool>>,

    /// Creation timestamp, in seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,

    /// Last update timestamp, in seconds since the Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl ProfileView {
    /// Represent a profile as the provided viewer is allowed to see it.
    pub fn for_viewer(viewer: &Actor, model: user::Model) -> Self {
        if viewer.id == model.id || viewer.is_admin() {
            Self::full(model)
        } else {
            Self::public(model)
        }
    }

    /// Complete profile, including internal fields.
    pub fn full(model: user::Model) -> Self {
        Self {
            id: Some(model.id),
            username: model.username,
            email: Some(model.email),
            phone_number: model.phone_number,
            role: Some(model.role),
            is_activated: Some(model.is_activated),
            is_deleted: Some(model.is_deleted),
            is_verified: Some(model.is_verified),
            name: model.name,
            gender: model.gender,
            status: model.status,
            orientation: model.orientation,
            biographic: model.biographic,
            year_of_birth: model.year_of_birth,
            body_type: model.body_type,
            diet: model.diet,
            drinks: model.drinks,
            drugs: model.drugs,
            education: model.education,
            ethnicity: model.ethnicity,
            height: model.height,
            income: model.income,
            job: model.job,
            location: model.location,
            offspring: model.offspring,
            pets: model.pets,
            sign: model.sign,
            smokes: model.smokes,
            speaks: model.speaks,
            region_code: model.region_code,
            shown_fields: Some(ShownFields::from_bits(model.shown_fields).to_map()),
            created_at: Some(unix_timestamp(model.created_at)),
            updated_at: Some(unix_timestamp(model.updated_at)),
        }
    }

    /// Profile as seen by other users.
    pub fn public(model: user::Model) -> Self {
        let shown = ShownFields::from_bits(model.shown_fields);

        Self {
            username: model.username,
            email: shown.reveal(ProfileField::Email, Some(model.email)),
            phone_number: shown.reveal(ProfileField::PhoneNumber, model.phone_number),
            name: model.name,
            gender: model.gender,
            status: model.status,
            orientation: model.orientation,
            biographic: model.biographic,
            year_of_birth: shown.reveal(ProfileField::YearOfBirth, model.year_of_birth),
            body_type: shown.reveal(ProfileField::BodyType, model.body_type),
            diet: shown.reveal(ProfileField::Diet, model.diet),
            drinks: shown.reveal(ProfileField::Drinks, model.drinks),
            drugs: shown.reveal(ProfileField::Drugs, model.drugs),
            education: shown.reveal(ProfileField::Education, model.education),
            ethnicity: shown.reveal(ProfileField::Ethnicity, model.ethnicity),
            height: shown.reveal(ProfileField::Height, model.height),
            income: shown.reveal(ProfileField::Income, model.income),
            job: shown.reveal(ProfileField::Job, model.job),
            location: shown.reveal(ProfileField::Location, model.location),
            offspring: shown.reveal(ProfileField::Offspring, model.offspring),
            pets: shown.reveal(ProfileField::Pets, model.pets),
            sign: shown.reveal(ProfileField::Sign, model.sign),
            smokes: shown.reveal(ProfileField::Smokes, model.smokes),
            speaks: shown.reveal(ProfileField::Speaks, model.speaks),
            ..Default::default()
        }
    }
}

/// Partial update of profile attributes.
///
/// `None` leaves an attribute unchanged, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub phone_number: Option<Option<String>>,
    pub name: Option<Option<String>>,
    pub gender: Option<Option<String>>,
    pub status: Option<Option<String>>,
    pub orientation: Option<Option<String>>,
    pub biographic: Option<Option<String>>,
    pub year_of_birth: Option<Option<i32>>,
    pub body_type: Option<Option<String>>,
    pub diet: Option<Option<String>>,
    pub drinks: Option<Option<String>>,
    pub drugs: Option<Option<String>>,
    pub education: Option<Option<String>>,
    pub ethnicity: Option<Option<String>>,
    pub height: Option<Option<i32>>,
    pub income: Option<Option<i32>>,
    pub job: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub offspring: Option<Option<String>>,
    pub pets: Option<Option<String>>,
    pub sign: Option<Option<String>>,
    pub smokes: Option<Option<String>>,
    pub speaks: Option<Option<String>>,
}

impl ProfileChanges {
    /// Convert changes into an active model of the provided user.
    ///
    /// Changing the location re-derives the region code as well, and clearing
    /// the location clears the region code.
    pub fn into_active_model(self, user_id: i64) -> user::ActiveModel {
        fn set<T>(value: Option<Option<T>>) -> ActiveValue<Option<T>>
        where
            Option<T>: Into<db::sea_query::Value>,
        {
            value.map_or(ActiveValue::NotSet, ActiveValue::Set)
        }

        let region_code = self.location.as_ref().map_or(ActiveValue::NotSet, |location| {
            ActiveValue::Set(location.as_deref().and_then(user::region_code))
        });

        user::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            phone_number: set(self.phone_number),
            name: set(self.name),
            gender: set(self.gender),
            status: set(self.status),
            orientation: set(self.orientation),
            biographic: set(self.biographic),
            year_of_birth: set(self.year_of_birth),
            body_type: set(self.body_type),
            diet: set(self.diet),
            drinks: set(self.drinks),
            drugs: set(self.drugs),
            education: set(self.education),
            ethnicity: set(self.ethnicity),
            height: set(self.height),
            income: set(self.income),
            job: set(self.job),
            location: set(self.location),
            offspring: set(self.offspring),
            pets: set(self.pets),
            sign: set(self.sign),
            smokes: set(self.smokes),
            speaks: set(self.speaks),
            region_code,
            updated_at: ActiveValue::Set(db::now()),
            ..Default::default()
        }
    }
}

fn unix_timestamp(value: PrimitiveDateTime) -> i64 {
    value.assume_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use db::{
        user::{self, Role},
        ActiveValue,
    };

    use super::{ProfileChanges, ProfileField, ProfileView, ShownFields};
    use crate::Actor;

    fn model() -> user::Model {
        user::Model {
            id: 2,
            username: String::from("bob"),
            email: String::from("bob@example.com"),
            phone_number: Some(String::from("+10000000000")),
            role: Role::User,
            is_activated: true,
            is_deleted: false,
            is_verified: true,
            name: Some(String::from("Bob")),
            gender: Some(String::from("m")),
            status: None,
            orientation: None,
            biographic: Some(String::from("hello")),
            year_of_birth: Some(1990),
            body_type: Some(String::from("fit")),
            diet: Some(String::from("anything")),
            drinks: Some(String::from("socially")),
            drugs: Some(String::from("never")),
            education: Some(String::from("college")),
            ethnicity: Some(String::from("asian")),
            height: Some(180),
            income: Some(1000),
            job: Some(String::from("engineer")),
            location: Some(String::from("79, Ho Chi Minh City")),
            offspring: Some(String::from("none")),
            pets: Some(String::from("cats")),
            sign: Some(String::from("leo")),
            smokes: Some(String::from("no")),
            speaks: Some(String::from("english")),
            region_code: Some(String::from("79")),
            shown_fields: 0,
            created_at: db::now(),
            updated_at: db::now(),
        }
    }

    fn actor(id: i64, role: Role) -> Actor {
        Actor {
            id,
            username: format!("user{id}"),
            role,
        }
    }

    #[test]
    fn owner_and_admin_see_everything() {
        let owner = ProfileView::for_viewer(&actor(2, Role::User), model());
        let admin = ProfileView::for_viewer(&actor(1, Role::Admin), model());

        assert_eq!(owner, ProfileView::full(model()));
        assert_eq!(admin, ProfileView::full(model()));
        assert_eq!(owner.role, Some(Role::User));
        assert_eq!(owner.phone_number.as_deref(), Some("+10000000000"));
    }

    #[test]
    fn strangers_see_nothing_hidden() {
        let view = ProfileView::for_viewer(&actor(3, Role::User), model());
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "username": "bob",
                "name": "Bob",
                "gender": "m",
                "biographic": "hello",
            })
        );
    }

    #[test]
    fn strangers_see_shown_fields_only() {
        let mut shown = ShownFields::default();
        shown.set(ProfileField::Job, true);
        shown.set(ProfileField::Email, true);

        let view = ProfileView::for_viewer(
            &actor(3, Role::User),
            user::Model {
                shown_fields: shown.bits(),
                ..model()
            },
        );

        assert_eq!(view.job.as_deref(), Some("engineer"));
        assert_eq!(view.email.as_deref(), Some("bob@example.com"));
        assert_eq!(view.location, None);
        assert_eq!(view.phone_number, None);
        assert_eq!(view.id, None);
        assert_eq!(view.role, None);
        assert_eq!(view.is_deleted, None);
        assert_eq!(view.region_code, None);
        assert_eq!(view.shown_fields, None);
        assert_eq!(view.created_at, None);
    }

    #[test]
    fn every_field_is_gated_by_its_own_bit() {
        for field in ProfileField::ALL {
            let mut shown = ShownFields::default();
            shown.set(field, true);

            let view = ProfileView::public(user::Model {
                shown_fields: shown.bits(),
                ..model()
            });

            let json = serde_json::to_value(&view).unwrap();
            let key = serde_json::to_value(field).unwrap();
            let object = json.as_object().unwrap();

            assert!(object.contains_key(key.as_str().unwrap()));
            // Username, name, gender, biographic and the shown field.
            assert_eq!(object.len(), 5);
        }
    }

    #[test]
    fn partial_updates_keep_other_fields() {
        let mut shown = ShownFields::default();
        shown.set(ProfileField::Diet, true);

        let changes = BTreeMap::from([(ProfileField::Pets, true), (ProfileField::Diet, false)]);
        let shown = shown.apply(&changes);

        assert!(shown.contains(ProfileField::Pets));
        assert!(!shown.contains(ProfileField::Diet));
        assert_eq!(shown.to_map().len(), ProfileField::ALL.len());
    }

    #[test]
    fn attributes_can_be_cleared() {
        let model = ProfileChanges {
            job: Some(Some(String::from("engineer"))),
            location: Some(None),
            ..Default::default()
        }
        .into_active_model(2);

        assert!(matches!(model.job, ActiveValue::Set(Some(ref job)) if job == "engineer"));
        assert!(matches!(model.location, ActiveValue::Set(None)));
        assert!(matches!(model.region_code, ActiveValue::Set(None)));
        assert!(matches!(model.name, ActiveValue::NotSet));
    }
}
