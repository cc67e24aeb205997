//! The async DTI client.
//!
//! # Design
//! `Client` pairs the stateless `DtiClient` from `dti-core` with a reqwest
//! transport: every call is build request, execute, parse response. The
//! only state is the species/color/pose cache, shared behind an `Arc` so
//! clones of one `Client` see the same cache.

use std::sync::Arc;

use dti_core::urls::sanitize_url;
use dti_core::{
    AppearanceLayer, Catalog, Color, DtiClient, HttpRequest, HttpResponse, LayerImageSize, Lookup,
    Neopet, Outfit, PetAppearance, PetPose, PoseBits, SearchParams, Species, ValidPoses, Zone,
};

use crate::cache::{Cache, Snapshot};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::search::Search;
use crate::transport::Transport;

/// Color used by [`Client::fetch_all_appearances`] when none is given.
pub const DEFAULT_COLOR: &str = "Blue";

/// What [`Client::fetch_neopet`] should build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeopetQuery {
    pub species: Lookup,
    pub color: Lookup,
    pub item_ids: Vec<u64>,
    /// Exact item names. When set, these are used instead of `item_ids`.
    pub item_names: Vec<String>,
    pub pose: Option<PetPose>,
    pub size: LayerImageSize,
}

impl NeopetQuery {
    pub fn new(species: impl Into<Lookup>, color: impl Into<Lookup>) -> Self {
        Self {
            species: species.into(),
            color: color.into(),
            item_ids: Vec::new(),
            item_names: Vec::new(),
            pose: None,
            size: LayerImageSize::default(),
        }
    }

    pub fn item_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.item_ids = ids.into_iter().collect();
        self
    }

    pub fn item_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn pose(mut self, pose: PetPose) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn size(mut self, size: LayerImageSize) -> Self {
        self.size = size;
        self
    }
}

/// Async client for the DTI API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    api: DtiClient,
    transport: Transport,
    cache: Cache,
}

impl Client {
    /// A client for the public DTI API with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = Transport::new(&config)?;
        Ok(Self {
            inner: Arc::new(Inner {
                api: DtiClient::new(&config.base_url),
                transport,
                cache: Cache::new(config.cache_timeout.max(crate::config::MIN_CACHE_TIMEOUT)),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.api.base_url()
    }

    pub(crate) fn api(&self) -> &DtiClient {
        &self.inner.api
    }

    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.inner.transport.execute(request).await?)
    }

    // ---------------------------------------------------------------------
    // Cached species / colors / poses
    // ---------------------------------------------------------------------

    async fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.inner.cache.get_or_refresh(|| self.fetch_snapshot()).await
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let (catalog, valid_poses) = tokio::try_join!(self.fetch_catalog(), self.fetch_valid_poses())?;
        Ok(Snapshot::new(catalog, valid_poses))
    }

    async fn fetch_catalog(&self) -> Result<Catalog> {
        let api = self.api();
        let response = self.send(api.build_all_species_and_colors()?).await?;
        Ok(api.parse_all_species_and_colors(response)?)
    }

    async fn fetch_valid_poses(&self) -> Result<ValidPoses> {
        let api = self.api();
        let response = self.send(api.build_valid_pet_poses()).await?;
        Ok(api.parse_valid_pet_poses(response)?)
    }

    /// Drop the cached species, colors and pose table.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate().await;
    }

    pub async fn all_species(&self) -> Result<Vec<Species>> {
        Ok(self.snapshot().await?.species.iter().cloned().collect())
    }

    pub async fn all_colors(&self) -> Result<Vec<Color>> {
        Ok(self.snapshot().await?.colors.iter().cloned().collect())
    }

    /// Species by id or case-insensitive name.
    pub async fn get_species(&self, key: impl Into<Lookup>) -> Result<Species> {
        let key = key.into();
        let snapshot = self.snapshot().await?;
        snapshot.species.get(key.clone()).cloned().ok_or(Error::InvalidSpecies(key))
    }

    /// Color by id or case-insensitive name.
    pub async fn get_color(&self, key: impl Into<Lookup>) -> Result<Color> {
        let key = key.into();
        let snapshot = self.snapshot().await?;
        snapshot.colors.get(key.clone()).cloned().ok_or(Error::InvalidColor(key))
    }

    async fn resolve(&self, species: Lookup, color: Lookup) -> Result<(Arc<Snapshot>, Species, Color)> {
        let snapshot = self.snapshot().await?;
        let species = snapshot.species.get(species.clone()).cloned().ok_or(Error::InvalidSpecies(species))?;
        let color = snapshot.colors.get(color.clone()).cloned().ok_or(Error::InvalidColor(color))?;
        Ok((snapshot, species, color))
    }

    /// `resolve`, then reject pairs (or poses) the pose table says do not exist.
    async fn resolve_valid(
        &self,
        species: Lookup,
        color: Lookup,
        pose: Option<PetPose>,
    ) -> Result<(Arc<Snapshot>, Species, Color)> {
        let (snapshot, species, color) = self.resolve(species, color).await?;
        if !snapshot.valid_poses.check(species.id, color.id, pose) {
            return Err(Error::InvalidColorSpeciesPair {
                species: species.name,
                color: color.name,
            });
        }
        Ok((snapshot, species, color))
    }

    /// The poses that exist for a species/color pair.
    pub async fn get_bit(&self, species: impl Into<Lookup>, color: impl Into<Lookup>) -> Result<PoseBits> {
        let (snapshot, species, color) = self.resolve(species.into(), color.into()).await?;
        Ok(snapshot.valid_poses.bits(species.id, color.id))
    }

    /// Whether the pair exists at all (`pose = None`) or in a given pose.
    pub async fn check(&self, species: impl Into<Lookup>, color: impl Into<Lookup>, pose: Option<PetPose>) -> Result<bool> {
        Ok(self.get_bit(species, color).await?.check(pose))
    }

    /// Colors a species can (or, with `valid = false`, cannot) be painted.
    pub async fn colors_for_species(&self, species: impl Into<Lookup>, valid: bool) -> Result<Vec<Color>> {
        let species = self.get_species(species).await?;
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .valid_poses
            .colors_for(species.id, valid)
            .into_iter()
            .filter_map(|id| snapshot.colors.by_id(id).cloned())
            .collect())
    }

    /// Species that can (or cannot) be painted a color.
    pub async fn species_for_color(&self, color: impl Into<Lookup>, valid: bool) -> Result<Vec<Species>> {
        let color = self.get_color(color).await?;
        let snapshot = self.snapshot().await?;
        Ok(snapshot
            .valid_poses
            .species_for(color.id, valid)
            .into_iter()
            .filter_map(|id| snapshot.species.by_id(id).cloned())
            .collect())
    }

    // ---------------------------------------------------------------------
    // Pets
    // ---------------------------------------------------------------------

    /// A customizable pet with every modeled pose and the requested items.
    pub async fn fetch_neopet(&self, query: NeopetQuery) -> Result<Neopet> {
        let (snapshot, species, color) = self.resolve_valid(query.species, query.color, query.pose).await?;
        let valid_poses = snapshot.valid_poses.bits(species.id, color.id);

        let api = self.api();
        let request = if query.item_names.is_empty() {
            api.build_assets_by_ids(species.id, color.id, &query.item_ids, query.size)?
        } else {
            api.build_assets_by_names(species.id, color.id, &query.item_names, query.size)?
        };
        let assets = api.parse_assets(species.id, color.id, self.send(request).await?)?;

        Ok(Neopet {
            species,
            color,
            pose: query.pose.unwrap_or_else(PetPose::ideal),
            valid_poses,
            appearances: assets.pet_appearances,
            items: assets.items,
            name: None,
            size: query.size,
        })
    }

    /// A real pet from Neopets.com, wearing what it wears there.
    pub async fn fetch_neopet_by_name(&self, name: &str, size: LayerImageSize) -> Result<Neopet> {
        let api = self.api();
        let response = self.send(api.build_pet_on_neopets(name, size)?).await?;
        let pet = api.parse_pet_on_neopets(name, response)?;

        let appearance = pet.pet_appearance;
        let query = NeopetQuery::new(appearance.species.id, appearance.color.id)
            .item_ids(pet.worn_item_ids)
            .pose(appearance.pose)
            .size(size);
        let mut neopet = self.fetch_neopet(query).await?;
        neopet.name = Some(name.to_string());
        Ok(neopet)
    }

    /// The pet an outfit is built on, wearing the outfit's items.
    pub async fn outfit_neopet(&self, outfit: &Outfit, size: LayerImageSize) -> Result<Neopet> {
        let appearance = &outfit.pet_appearance;
        // Closeted first so the worn items win any zone conflict.
        let item_ids = outfit
            .closeted_items
            .iter()
            .chain(&outfit.worn_items)
            .map(|item| item.id);
        let query = NeopetQuery::new(appearance.species.id, appearance.color.id)
            .item_ids(item_ids)
            .pose(appearance.pose)
            .size(size);
        self.fetch_neopet(query).await
    }

    /// One pet per species in `color` (default Blue), each wearing whichever
    /// of `item_ids` fit its body.
    pub async fn fetch_all_appearances(
        &self,
        color: Option<Lookup>,
        item_ids: &[u64],
        size: LayerImageSize,
    ) -> Result<Vec<Neopet>> {
        let color = self.get_color(color.unwrap_or_else(|| Lookup::from(DEFAULT_COLOR))).await?;
        let snapshot = self.snapshot().await?;

        let api = self.api();
        let response = self
            .send(api.build_all_appearances_for_color(color.id, item_ids, size)?)
            .await?;
        let found = api.parse_all_appearances_for_color(response)?;

        Ok(found
            .pet_appearances
            .iter()
            .map(|appearance| {
                let bits = snapshot.valid_poses.bits(appearance.species.id, appearance.color.id);
                let items = found.items_for_body(appearance.body_id);
                Neopet::from_appearance(appearance.clone(), bits, items, size)
            })
            .collect())
    }

    // ---------------------------------------------------------------------
    // Single endpoints
    // ---------------------------------------------------------------------

    pub async fn fetch_outfit(&self, id: u64, size: LayerImageSize) -> Result<Outfit> {
        let api = self.api();
        let response = self.send(api.build_outfit(id, size)?).await?;
        Ok(api.parse_outfit(id, response)?)
    }

    /// Start a search. Nothing is fetched until the first page is pulled.
    pub fn search(&self, params: SearchParams) -> Result<Search> {
        Ok(Search::new(self.clone(), params.into_query()?))
    }

    pub async fn fetch_appearance(
        &self,
        species: impl Into<Lookup>,
        color: impl Into<Lookup>,
        pose: PetPose,
        size: LayerImageSize,
    ) -> Result<PetAppearance> {
        let (_, species, color) = self.resolve_valid(species.into(), color.into(), Some(pose)).await?;
        let api = self.api();
        let response = self
            .send(api.build_pet_appearance(species.id, color.id, pose, size)?)
            .await?;
        Ok(api.parse_pet_appearance(species.id, color.id, pose, response)?)
    }

    pub async fn fetch_appearance_by_id(&self, id: u64, size: LayerImageSize) -> Result<PetAppearance> {
        let api = self.api();
        let response = self.send(api.build_pet_appearance_by_id(id, size)?).await?;
        Ok(api.parse_pet_appearance_by_id(id, response)?)
    }

    /// Every modeled pose of a species/color.
    pub async fn fetch_appearances(
        &self,
        species: impl Into<Lookup>,
        color: impl Into<Lookup>,
        size: LayerImageSize,
    ) -> Result<Vec<PetAppearance>> {
        let (_, species, color) = self.resolve_valid(species.into(), color.into(), None).await?;
        let api = self.api();
        let response = self.send(api.build_pet_appearances(species.id, color.id, size)?).await?;
        Ok(api.parse_pet_appearances(response)?)
    }

    pub async fn fetch_appearance_ids(&self, species: impl Into<Lookup>, color: impl Into<Lookup>) -> Result<Vec<u64>> {
        let (_, species, color) = self.resolve_valid(species.into(), color.into(), None).await?;
        let api = self.api();
        let response = self.send(api.build_pet_appearance_ids(species.id, color.id)?).await?;
        Ok(api.parse_pet_appearance_ids(response)?)
    }

    pub async fn fetch_all_zones(&self) -> Result<Vec<Zone>> {
        let api = self.api();
        let response = self.send(api.build_all_zones()?).await?;
        Ok(api.parse_all_zones(response)?)
    }

    /// Download a layer's image bytes.
    pub async fn read_layer(&self, layer: &AppearanceLayer) -> Result<Vec<u8>> {
        let url = layer
            .image_url
            .as_deref()
            .map(sanitize_url)
            .ok_or(dti_core::ApiError::BrokenAssetImage { layer_id: layer.id })?;
        let api = self.api();
        let response = self.send(api.build_asset(&url)).await?;
        Ok(api.parse_asset(response)?)
    }
}
