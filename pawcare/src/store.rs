use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use common::{
    AdviceCard, AdviceCardFilter, CategoryCode, CategoryFilter, CreateAdviceCardCommand,
    CreateDogCommand, Dog, ProblemCategory, User,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),
    #[error("Dog not found: {0}")]
    DogNotFound(Uuid),
    #[error("Unknown problem category: {0}")]
    UnknownCategory(CategoryCode),
    #[error("Problem category already exists: {0}")]
    DuplicateCategory(CategoryCode),
}

/// In-memory persistence for users, dogs, advice cards and problem categories.
#[derive(Debug, Default)]
pub struct DogStore {
    users: HashMap<Uuid, User>,
    dogs: HashMap<Uuid, Dog>,
    cards: Vec<AdviceCard>,
    categories: Vec<ProblemCategory>,
}

impl DogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_user(&mut self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn add_category(&mut self, category: ProblemCategory) -> Result<(), StoreError> {
        if self.categories.iter().any(|c| c.code == category.code) {
            return Err(StoreError::DuplicateCategory(category.code));
        }
        self.categories.push(category);
        Ok(())
    }

    pub fn create_dog(&mut self, owner: Uuid, command: CreateDogCommand) -> Result<Dog, StoreError> {
        if !self.users.contains_key(&owner) {
            return Err(StoreError::UserNotFound(owner));
        }

        let dog = Dog::from_command(owner, command, Utc::now());
        debug!(dog.id = %dog.id, owner = %owner, "dog stored");
        self.dogs.insert(dog.id, dog.clone());
        Ok(dog)
    }

    /// Dogs of `owner`, newest first.
    #[must_use]
    pub fn list_dogs(&self, owner: Uuid) -> Vec<Dog> {
        let mut dogs: Vec<Dog> = self
            .dogs
            .values()
            .filter(|d| d.owner_id == owner)
            .cloned()
            .collect();
        dogs.sort_by_key(|d| Reverse(d.created_at));
        dogs
    }

    /// A dog owned by someone else is reported as missing.
    pub fn get_dog(&self, owner: Uuid, id: Uuid) -> Result<Dog, StoreError> {
        self.dogs
            .get(&id)
            .filter(|d| d.owner_id == owner)
            .cloned()
            .ok_or(StoreError::DogNotFound(id))
    }

    /// Records advice for one of `owner`'s dogs. The category must be known.
    pub fn create_advice_card(
        &mut self,
        owner: Uuid,
        dog: Uuid,
        command: CreateAdviceCardCommand,
    ) -> Result<AdviceCard, StoreError> {
        self.get_dog(owner, dog)?;

        let card = AdviceCard::from_command(dog, command, Utc::now());
        self.add_advice_card(card.clone())?;
        debug!(card.id = %card.id, dog.id = %dog, "advice card stored");
        Ok(card)
    }

    pub fn add_advice_card(&mut self, card: AdviceCard) -> Result<(), StoreError> {
        if !self.dogs.contains_key(&card.dog_id) {
            return Err(StoreError::DogNotFound(card.dog_id));
        }
        if !self.categories.iter().any(|c| c.code == card.category_code) {
            return Err(StoreError::UnknownCategory(card.category_code));
        }
        self.cards.push(card);
        Ok(())
    }

    /// Cards of one of `owner`'s dogs, newest first.
    pub fn list_advice_cards(
        &self,
        owner: Uuid,
        dog: Uuid,
        filter: &AdviceCardFilter,
    ) -> Result<Vec<AdviceCard>, StoreError> {
        self.get_dog(owner, dog)?;

        let mut cards: Vec<AdviceCard> = self
            .cards
            .iter()
            .filter(|c| c.dog_id == dog && filter.matches(c))
            .cloned()
            .collect();
        cards.sort_by_key(|c| Reverse(c.created_at));
        Ok(cards)
    }

    /// Categories ordered by ascending priority.
    #[must_use]
    pub fn list_categories(&self, filter: &CategoryFilter) -> Vec<ProblemCategory> {
        let mut categories: Vec<ProblemCategory> = self
            .categories
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        categories.sort_by_key(|c| c.priority);
        categories
    }
}
