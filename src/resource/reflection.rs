//! Reflection resources
//!
//! Raw reflections list display fields; aggregation reflections list dimensions and
//! measures, either in the general form or in the simplified one where the list a name
//! appears in implies its granularity or measure type.

use super::lifecycle::{Resource, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use crate::codec::reflection::{
    decode_dimension_fields, decode_field_names, decode_measure_fields,
    decode_simple_dimensions, decode_sum_measures, encode_dimension_fields, encode_field_names,
    encode_measure_fields, encode_simple_dimensions, encode_sum_measures, DimensionField,
    MeasureField,
};
use crate::dremio::models::{
    AggregationReflection, AggregationReflectionSpec, RawReflectionSpec, ReflectionField,
    ReflectionFieldWithGranularity, ReflectionMeasureField,
};
use crate::dremio::DremioApi;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PARTITION_DISTRIBUTION_STRATEGY: &str = "CONSOLIDATED";

fn default_enabled() -> bool {
    true
}

fn default_strategy() -> String {
    DEFAULT_PARTITION_DISTRIBUTION_STRATEGY.to_string()
}

/// Attributes every reflection kind carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionCommonAttrs {
    #[serde(default)]
    pub dataset_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub distribution_fields: Vec<String>,
    #[serde(default)]
    pub partition_fields: Vec<String>,
    #[serde(default)]
    pub sort_fields: Vec<String>,
    #[serde(default = "default_strategy")]
    pub partition_distribution_strategy: String,
}

impl Default for ReflectionCommonAttrs {
    fn default() -> Self {
        Self {
            dataset_id: String::new(),
            name: String::new(),
            enabled: true,
            distribution_fields: Vec::new(),
            partition_fields: Vec::new(),
            sort_fields: Vec::new(),
            partition_distribution_strategy: default_strategy(),
        }
    }
}

impl ReflectionCommonAttrs {
    #[allow(clippy::too_many_arguments)]
    fn read_from(
        &mut self,
        dataset_id: &str,
        name: &str,
        enabled: bool,
        distribution: &[ReflectionField],
        partition: &[ReflectionField],
        sort: &[ReflectionField],
        strategy: &str,
    ) {
        self.dataset_id = dataset_id.to_string();
        self.name = name.to_string();
        self.enabled = enabled;
        self.distribution_fields = decode_field_names(distribution);
        self.partition_fields = decode_field_names(partition);
        self.sort_fields = decode_field_names(sort);
        self.partition_distribution_strategy = strategy.to_string();
    }
}

fn reflection_schema(base: Schema) -> Schema {
    base.with("dataset_id", Attribute::required(AttrType::String).force_new())
        .with("name", Attribute::required(AttrType::String))
        .with("enabled", Attribute::optional(AttrType::Bool).with_default(true))
        .with("distribution_fields", Attribute::optional(AttrType::string_list()))
        .with("partition_fields", Attribute::optional(AttrType::string_list()))
        .with("sort_fields", Attribute::optional(AttrType::string_list()))
        .with(
            "partition_distribution_strategy",
            Attribute::optional(AttrType::String)
                .with_default(DEFAULT_PARTITION_DISTRIBUTION_STRATEGY),
        )
}

// =============================================================================
// Raw
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReflectionAttrs {
    #[serde(flatten)]
    pub common: ReflectionCommonAttrs,
    #[serde(default)]
    pub display_fields: Vec<String>,
}

impl RawReflectionAttrs {
    fn to_spec(&self) -> RawReflectionSpec {
        RawReflectionSpec {
            name: self.common.name.clone(),
            enabled: self.common.enabled,
            display_fields: encode_field_names(&self.display_fields),
            distribution_fields: encode_field_names(&self.common.distribution_fields),
            partition_fields: encode_field_names(&self.common.partition_fields),
            sort_fields: encode_field_names(&self.common.sort_fields),
            partition_distribution_strategy: self.common.partition_distribution_strategy.clone(),
        }
    }
}

pub struct RawReflectionResource;

impl Resource for RawReflectionResource {
    const TYPE_NAME: &'static str = "dremio_raw_reflection";

    type Attrs = RawReflectionAttrs;

    fn schema() -> Schema {
        reflection_schema(Schema::new())
            .with("display_fields", Attribute::required(AttrType::string_list()))
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let reflection = client
            .new_raw_reflection(&data.attrs.common.dataset_id, &data.attrs.to_spec())
            .await?;
        tracing::info!("Created raw reflection '{}' ({})", reflection.name, reflection.id);
        data.set_id(reflection.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let r = client.get_raw_reflection(data.id()?).await?;
        data.attrs.common.read_from(
            &r.dataset_id,
            &r.name,
            r.enabled,
            &r.distribution_fields,
            &r.partition_fields,
            &r.sort_fields,
            &r.partition_distribution_strategy,
        );
        data.attrs.display_fields = decode_field_names(&r.display_fields);
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client
            .update_raw_reflection(data.id()?, &data.attrs.to_spec())
            .await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_reflection(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// How an aggregation kind lays out its dimensions and measures
pub trait AggregationLayout: Serialize + DeserializeOwned + Default {
    const TYPE_NAME: &'static str;

    fn schema() -> Schema;

    fn common(&self) -> &ReflectionCommonAttrs;

    fn common_mut(&mut self) -> &mut ReflectionCommonAttrs;

    fn to_spec(&self) -> AggregationReflectionSpec;

    fn read_fields(&mut self, reflection: &AggregationReflection);
}

fn aggregation_spec(
    common: &ReflectionCommonAttrs,
    dimension_fields: Vec<ReflectionFieldWithGranularity>,
    measure_fields: Vec<ReflectionMeasureField>,
) -> AggregationReflectionSpec {
    AggregationReflectionSpec {
        name: common.name.clone(),
        enabled: common.enabled,
        dimension_fields,
        measure_fields,
        distribution_fields: encode_field_names(&common.distribution_fields),
        partition_fields: encode_field_names(&common.partition_fields),
        sort_fields: encode_field_names(&common.sort_fields),
        partition_distribution_strategy: common.partition_distribution_strategy.clone(),
    }
}

/// Lifecycle shared by both aggregation layouts
pub struct AggregationReflectionResource<L>(std::marker::PhantomData<L>);

impl<L: AggregationLayout> Resource for AggregationReflectionResource<L> {
    const TYPE_NAME: &'static str = L::TYPE_NAME;

    type Attrs = L;

    fn schema() -> Schema {
        L::schema()
    }

    async fn create<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let reflection = client
            .new_aggregation_reflection(&data.attrs.common().dataset_id, &data.attrs.to_spec())
            .await?;
        tracing::info!(
            "Created aggregation reflection '{}' ({})",
            reflection.name,
            reflection.id
        );
        data.set_id(reflection.id);
        Self::read(client, data).await
    }

    async fn read<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        let r = client.get_aggregation_reflection(data.id()?).await?;
        data.attrs.common_mut().read_from(
            &r.dataset_id,
            &r.name,
            r.enabled,
            &r.distribution_fields,
            &r.partition_fields,
            &r.sort_fields,
            &r.partition_distribution_strategy,
        );
        data.attrs.read_fields(&r);
        Ok(())
    }

    async fn update<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client
            .update_aggregation_reflection(data.id()?, &data.attrs.to_spec())
            .await?;
        data.touch();
        Self::read(client, data).await
    }

    async fn delete<C: DremioApi>(client: &C, data: &mut ResourceData<Self::Attrs>) -> Result<()> {
        client.delete_reflection(data.id()?).await?;
        data.clear_id();
        Ok(())
    }
}

/// General form: explicit granularity per dimension, measure set per measure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggrReflectionAttrs {
    #[serde(flatten)]
    pub common: ReflectionCommonAttrs,
    #[serde(default)]
    pub dimension_fields: Vec<DimensionField>,
    #[serde(default)]
    pub measure_fields: Vec<MeasureField>,
}

impl AggregationLayout for AggrReflectionAttrs {
    const TYPE_NAME: &'static str = "dremio_aggr_reflection";

    fn schema() -> Schema {
        let dimension = Schema::new()
            .with("name", Attribute::required(AttrType::String))
            .with("granularity", Attribute::required(AttrType::String));
        let measure = Schema::new()
            .with("name", Attribute::required(AttrType::String))
            .with("measure", Attribute::required(AttrType::set_of(AttrType::String)));

        reflection_schema(Schema::new())
            .with(
                "dimension_fields",
                Attribute::required(AttrType::list_of(AttrType::Object(dimension))),
            )
            .with(
                "measure_fields",
                Attribute::optional(AttrType::list_of(AttrType::Object(measure))),
            )
    }

    fn common(&self) -> &ReflectionCommonAttrs {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ReflectionCommonAttrs {
        &mut self.common
    }

    fn to_spec(&self) -> AggregationReflectionSpec {
        aggregation_spec(
            &self.common,
            encode_dimension_fields(&self.dimension_fields),
            encode_measure_fields(&self.measure_fields),
        )
    }

    fn read_fields(&mut self, reflection: &AggregationReflection) {
        self.dimension_fields = decode_dimension_fields(&reflection.dimension_fields);
        self.measure_fields = decode_measure_fields(&reflection.measure_fields);
    }
}

/// Simplified form: NORMAL and DATE dimension lists, SUM-only measures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleAggrReflectionAttrs {
    #[serde(flatten)]
    pub common: ReflectionCommonAttrs,
    #[serde(default)]
    pub dimension_fields: Vec<String>,
    #[serde(default)]
    pub date_dimension_fields: Vec<String>,
    #[serde(default)]
    pub measure_fields: Vec<String>,
}

impl AggregationLayout for SimpleAggrReflectionAttrs {
    const TYPE_NAME: &'static str = "dremio_aggr_reflection_simple";

    fn schema() -> Schema {
        reflection_schema(Schema::new())
            .with("dimension_fields", Attribute::optional(AttrType::string_list()))
            .with(
                "date_dimension_fields",
                Attribute::optional(AttrType::string_list()),
            )
            .with("measure_fields", Attribute::optional(AttrType::string_list()))
    }

    fn common(&self) -> &ReflectionCommonAttrs {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ReflectionCommonAttrs {
        &mut self.common
    }

    fn to_spec(&self) -> AggregationReflectionSpec {
        aggregation_spec(
            &self.common,
            encode_simple_dimensions(&self.dimension_fields, &self.date_dimension_fields),
            encode_sum_measures(&self.measure_fields),
        )
    }

    fn read_fields(&mut self, reflection: &AggregationReflection) {
        let (normal, date) = decode_simple_dimensions(&reflection.dimension_fields);
        self.dimension_fields = normal;
        self.date_dimension_fields = date;
        self.measure_fields = decode_sum_measures(&reflection.measure_fields);
    }
}

pub type AggrReflectionResource = AggregationReflectionResource<AggrReflectionAttrs>;
pub type SimpleAggrReflectionResource = AggregationReflectionResource<SimpleAggrReflectionAttrs>;
