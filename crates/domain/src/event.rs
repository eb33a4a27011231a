//! Catalog event service. Plain CRUD, no deletion guard.

use common::EventId;
use store::{Event, EventRepository};

use crate::error::DomainError;

/// Service for managing catalog events.
#[derive(Clone)]
pub struct EventService<E: EventRepository> {
    events: E,
}

impl<E: EventRepository> EventService<E> {
    pub fn new(events: E) -> Self {
        Self { events }
    }

    #[tracing::instrument(skip(self, event))]
    pub async fn create(&self, mut event: Event) -> Result<Event, DomainError> {
        event.id = None;
        Ok(self.events.save_event(event).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Event>, DomainError> {
        Ok(self.events.find_all_events().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: EventId) -> Result<Option<Event>, DomainError> {
        Ok(self.events.find_event(id).await?)
    }

    #[tracing::instrument(skip(self, event))]
    pub async fn update(&self, id: EventId, event: Event) -> Result<Event, DomainError> {
        if self.events.find_event(id).await?.is_none() {
            return Err(DomainError::not_found("Event", id));
        }

        let replacement = Event {
            id: Some(id),
            ..event
        };
        Ok(self.events.save_event(replacement).await?)
    }

    /// Deletes an event. Absent ids are ignored.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: EventId) -> Result<(), DomainError> {
        self.events.delete_event(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::InMemoryStore;

    fn event(title: &str) -> Event {
        Event {
            id: None,
            image_src: "/img/event.png".to_string(),
            image_alt: "Event banner".to_string(),
            title: title.to_string(),
            description: "Bring your own dice".to_string(),
        }
    }

    #[tokio::test]
    async fn crud_cycle() {
        let service = EventService::new(InMemoryStore::new());

        let created = service.create(event("Catan night")).await.unwrap();
        let id = created.id.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);

        let updated = service.update(id, event("Catan finals")).await.unwrap();
        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.title, "Catan finals");

        service.delete(id).await.unwrap();
        assert!(service.get(id).await.unwrap().is_none());
        service.delete(id).await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_event_is_not_found() {
        let service = EventService::new(InMemoryStore::new());

        let result = service.update(EventId::new(1), event("nothing")).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}
