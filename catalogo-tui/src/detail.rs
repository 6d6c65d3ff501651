//! Category detail: ranked classifications and the tags observed under each.
//!
//! The screen keeps three cached lists next to the category itself: every
//! active classification ranked by rating, every tag occurrence recorded for
//! the category, and every active tag (the choices of the relation dialog).
//! Occurrences are fetched once per category and grouped client-side.

use crate::api_client::{ApiClientError, CatalogApi};
use crate::error::ControllerError;
use crate::ports::NotificationPort;
use catalogo_core::{
    CatalogItem, CreateOccurrenceRequest, ItemId, ListQuery, OccurrenceQuery, Resource,
    TagOccurrence,
};

/// Two-step dialog for relating a tag to the category.
///
/// `SelectingTag` never goes back to `SelectingClassification`; closing the
/// dialog is the only way out.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RelationDialog {
    #[default]
    Closed,
    SelectingClassification,
    SelectingTag {
        classification: CatalogItem,
        /// Case-insensitive substring narrowing the tag choices.
        filter: String,
    },
}

impl RelationDialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, RelationDialog::Closed)
    }
}

#[derive(Debug, Clone)]
pub struct DetailController {
    creator_user_id: String,
    category: Option<CatalogItem>,
    classifications: Vec<CatalogItem>,
    occurrences: Vec<TagOccurrence>,
    tags: Vec<CatalogItem>,
    dialog: RelationDialog,
}

impl DetailController {
    pub fn new(creator_user_id: impl Into<String>) -> Self {
        Self {
            creator_user_id: creator_user_id.into(),
            category: None,
            classifications: Vec::new(),
            occurrences: Vec::new(),
            tags: Vec::new(),
            dialog: RelationDialog::Closed,
        }
    }

    pub fn category(&self) -> Option<&CatalogItem> {
        self.category.as_ref()
    }

    pub fn classifications(&self) -> &[CatalogItem] {
        &self.classifications
    }

    pub fn occurrences(&self) -> &[TagOccurrence] {
        &self.occurrences
    }

    pub fn tags(&self) -> &[CatalogItem] {
        &self.tags
    }

    pub fn dialog(&self) -> &RelationDialog {
        &self.dialog
    }

    /// Load the category, then its classifications, occurrences and the tag
    /// choices concurrently.
    ///
    /// A failed reload of the shown category keeps the previous cache. A
    /// failed switch to another category clears it, so nothing can be
    /// written against the category that was shown before.
    pub async fn load(
        &mut self,
        category_id: &ItemId,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<(), ControllerError> {
        port.loading();
        let switching = self.category.as_ref().map(|c| &c.id) != Some(category_id);
        let loaded = match fetch_detail(category_id, api).await {
            Ok(loaded) => loaded,
            Err(err) => {
                if switching {
                    self.clear();
                }
                return Err(fail(port, err));
            }
        };

        tracing::debug!(
            category = %loaded.category.id,
            classifications = loaded.classifications.len(),
            occurrences = loaded.occurrences.len(),
            "Loaded category detail"
        );
        if switching {
            self.dialog = RelationDialog::Closed;
        }
        self.category = Some(loaded.category);
        self.classifications = loaded.classifications;
        self.occurrences = loaded.occurrences;
        self.tags = loaded.tags;
        port.close();
        Ok(())
    }

    fn clear(&mut self) {
        self.category = None;
        self.classifications.clear();
        self.occurrences.clear();
        self.tags.clear();
        self.dialog = RelationDialog::Closed;
    }

    /// Tags recorded for the category under one classification.
    pub fn occurrences_for(&self, classification_id: &ItemId) -> Vec<&CatalogItem> {
        self.occurrences
            .iter()
            .filter(|occurrence| occurrence.classification_id() == classification_id)
            .filter_map(|occurrence| {
                occurrence
                    .etiqueta
                    .item()
                    .or_else(|| self.tags.iter().find(|t| &t.id == occurrence.tag_id()))
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Relation dialog
    // ------------------------------------------------------------------------

    pub fn open_relation_dialog(&mut self, classification: Option<CatalogItem>) {
        self.dialog = match classification {
            Some(classification) => RelationDialog::SelectingTag {
                classification,
                filter: String::new(),
            },
            None => RelationDialog::SelectingClassification,
        };
    }

    /// Choose the classification; only valid in the first step.
    pub fn pick_classification(&mut self, classification: CatalogItem) -> bool {
        if self.dialog != RelationDialog::SelectingClassification {
            return false;
        }
        self.dialog = RelationDialog::SelectingTag {
            classification,
            filter: String::new(),
        };
        true
    }

    pub fn close_relation_dialog(&mut self) {
        self.dialog = RelationDialog::Closed;
    }

    pub fn selected_classification(&self) -> Option<&CatalogItem> {
        match &self.dialog {
            RelationDialog::SelectingTag { classification, .. } => Some(classification),
            _ => None,
        }
    }

    pub fn set_tag_filter(&mut self, text: impl Into<String>) {
        if let RelationDialog::SelectingTag { filter, .. } = &mut self.dialog {
            *filter = text.into();
        }
    }

    /// Tags offered by the dialog, narrowed by the filter text.
    pub fn tag_choices(&self) -> Vec<&CatalogItem> {
        let needle = match &self.dialog {
            RelationDialog::SelectingTag { filter, .. } => filter.to_lowercase(),
            _ => String::new(),
        };
        self.tags
            .iter()
            .filter(|tag| tag.descripcion.to_lowercase().contains(&needle))
            .collect()
    }

    /// Relate `tag` to the category under the selected classification, then
    /// reload the occurrences from the server and close the dialog.
    pub async fn add_occurrence(
        &mut self,
        tag: &CatalogItem,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<TagOccurrence, ControllerError> {
        let Some(classification) = self.selected_classification() else {
            port.info("Please select a classification first");
            return Err(ControllerError::NoClassificationSelected);
        };
        let Some(category) = self.category.as_ref() else {
            return Err(ControllerError::NotLoaded);
        };

        let body = CreateOccurrenceRequest {
            etiqueta_id: tag.id.clone(),
            categoria_id: category.id.clone(),
            clasificacion_id: classification.id.clone(),
            creator_user_id: self.creator_user_id.clone(),
        };
        let created = api
            .create_occurrence(&body)
            .await
            .map_err(|err| fail(port, err))?;

        tracing::info!(
            category = %body.categoria_id,
            classification = %body.clasificacion_id,
            tag = %body.etiqueta_id,
            "Added tag occurrence"
        );
        port.success("Tag added");
        // The dialog closes even if the reload fails; the failure is reported.
        if let Err(err) = self.reload_occurrences(api, port).await {
            tracing::debug!(error = %err, "Occurrence reload after add failed");
        }
        self.close_relation_dialog();
        Ok(created)
    }

    pub async fn reload_occurrences(
        &mut self,
        api: &dyn CatalogApi,
        port: &dyn NotificationPort,
    ) -> Result<(), ControllerError> {
        let Some(category) = self.category.as_ref() else {
            return Err(ControllerError::NotLoaded);
        };
        let query = OccurrenceQuery::for_category(category.id.clone());
        self.occurrences = api
            .list_occurrences(&query)
            .await
            .map_err(|err| fail(port, err))?;
        Ok(())
    }
}

struct LoadedDetail {
    category: CatalogItem,
    classifications: Vec<CatalogItem>,
    occurrences: Vec<TagOccurrence>,
    tags: Vec<CatalogItem>,
}

async fn fetch_detail(category_id: &ItemId, api: &dyn CatalogApi) -> Result<LoadedDetail, ApiClientError> {
    let category = api.get_item(Resource::Categorias, category_id).await?;

    let ranked = ListQuery::ranked_active();
    let tag_query = ListQuery::all_active();
    let occurrence_query = OccurrenceQuery::for_category(category.id.clone());
    let (classifications, occurrences, tags) = tokio::try_join!(
        api.list_items(Resource::Clasificaciones, &ranked),
        api.list_occurrences(&occurrence_query),
        api.list_items(Resource::Etiquetas, &tag_query),
    )?;
    Ok(LoadedDetail {
        category,
        classifications: classifications.items,
        occurrences,
        tags: tags.items,
    })
}

fn fail(port: &dyn NotificationPort, err: ApiClientError) -> ControllerError {
    tracing::warn!(error = %err, "Category detail request failed");
    port.error(&err.to_string());
    ControllerError::Api(err)
}
