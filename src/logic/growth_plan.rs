use crate::config::Config;
use crate::datasources::{
    ArchiveClient, ClimateArchive, ForecastClient, LiveConditionsSource, StagePlanner,
    StageServiceClient,
};
use crate::error::{CropwiseError, Result};
use crate::logic::calculations::{accumulate_gdd, archive_window, DEFAULT_ARCHIVE_LAG_DAYS};
use crate::logic::forecast_risk::project_forecast;
use crate::logic::soil::classify_sample;
use crate::models::{GddSummary, GrowthPlan, PlanRequest, StagePlanRequest};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    FetchingHistory,
    FetchingLive,
    RequestingStagePlan,
    Merged,
    Failed,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::FetchingHistory => "Fetching historical weather since sowing...",
            Phase::FetchingLive => "Fetching soil moisture and 16-day forecast...",
            Phase::RequestingStagePlan => "Analysing crop stage...",
            Phase::Merged => "Growth plan ready",
            Phase::Failed => "Growth plan failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Merged | Phase::Failed)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Progress notification sent on each phase transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseUpdate {
    pub run_id: u64,
    pub phase: Phase,
}

/// What a consumer sees: the latest run's phase and its result or error
#[derive(Debug, Clone, Default)]
pub struct PlanState {
    pub run_id: u64,
    pub phase: Phase,
    pub result: Option<GrowthPlan>,
    pub error: Option<String>,
}

/// Runs history fetch, live fetch and the stage-service call for one request
/// at a time. Each run gets an id; anything a run tries to apply after it has
/// been abandoned is dropped.
pub struct GrowthPlanService {
    archive: Arc<dyn ClimateArchive>,
    live: Arc<dyn LiveConditionsSource>,
    stages: Arc<dyn StagePlanner>,
    archive_lag_days: i64,
    run_lock: Mutex<()>,
    current_run: AtomicU64,
    state: Arc<RwLock<PlanState>>,
    progress: Option<mpsc::UnboundedSender<PhaseUpdate>>,
}

impl GrowthPlanService {
    pub fn new(
        archive: Arc<dyn ClimateArchive>,
        live: Arc<dyn LiveConditionsSource>,
        stages: Arc<dyn StagePlanner>,
    ) -> Self {
        Self {
            archive,
            live,
            stages,
            archive_lag_days: DEFAULT_ARCHIVE_LAG_DAYS,
            run_lock: Mutex::new(()),
            current_run: AtomicU64::new(0),
            state: Arc::new(RwLock::new(PlanState::default())),
            progress: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let archive = ArchiveClient::new(config.archive.clone());
        let live = ForecastClient::new(config.forecast.clone())
            .with_representative_hour(config.soil.representative_hour_index);
        let stages = StageServiceClient::new(config.stage_service.clone());

        Self::new(Arc::new(archive), Arc::new(live), Arc::new(stages))
            .with_archive_lag(config.archive_lag_days)
    }

    pub fn with_archive_lag(mut self, days: i64) -> Self {
        self.archive_lag_days = days;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<PhaseUpdate>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub async fn state(&self) -> PlanState {
        self.state.read().await.clone()
    }

    /// Discard the current run's context. A run still in flight completes its
    /// network calls but its outcome is not applied.
    pub async fn abandon(&self) {
        let mut state = self.state.write().await;
        let next = self.current_run.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!("Abandoning run {}", next - 1);
        *state = PlanState {
            run_id: next,
            ..PlanState::default()
        };
    }

    /// Execute one run. Fails with `Busy` if another run is in flight.
    pub async fn run(&self, request: PlanRequest) -> Result<GrowthPlan> {
        let _guard = self.run_lock.try_lock().map_err(|_| CropwiseError::Busy)?;

        let run_id = {
            let mut state = self.state.write().await;
            let run_id = self.current_run.fetch_add(1, Ordering::SeqCst) + 1;
            // A new run clears whatever the previous one produced
            *state = PlanState {
                run_id,
                ..PlanState::default()
            };
            run_id
        };

        match self.execute(run_id, &request).await {
            Ok(plan) => {
                self.finish(run_id, Ok(&plan)).await?;
                Ok(plan)
            }
            Err(CropwiseError::Superseded(id)) => Err(CropwiseError::Superseded(id)),
            Err(e) => {
                tracing::warn!("Run {} failed: {}", run_id, e);
                self.finish(run_id, Err(&e)).await?;
                Err(e)
            }
        }
    }

    async fn execute(&self, run_id: u64, request: &PlanRequest) -> Result<GrowthPlan> {
        let loc = &request.location;

        self.transition(run_id, Phase::FetchingHistory).await?;
        let gdd = self.fetch_history(request).await?;

        self.transition(run_id, Phase::FetchingLive).await?;
        let live = self.live.fetch_live(loc.latitude, loc.longitude).await?;
        let soil_moisture = classify_sample(&live.soil);
        let forecast = project_forecast(&live.forecast);

        self.transition(run_id, Phase::RequestingStagePlan).await?;
        let stage_request = StagePlanRequest {
            crop_type: request.crop,
            sowing_date: request.sowing_date,
            city: loc.city_name().to_string(),
            tmax: gdd.avg_max_temp_c,
            tmin: gdd.avg_min_temp_c,
            accumulated_gdd: gdd.accumulated_gdd,
            lat: loc.latitude,
            lon: loc.longitude,
        };
        let stage_plan = self.stages.request_plan(&stage_request).await?;

        let gaps = stage_plan
            .validate_stages()
            .map_err(|e| CropwiseError::InvalidData(format!("Stage service: {}", e)))?;
        for (from, to) in gaps {
            tracing::warn!("No crop stage covers days {} to {}", from, to);
        }

        Ok(GrowthPlan {
            crop: request.crop,
            sowing_date: request.sowing_date,
            location: loc.clone(),
            stage_plan,
            gdd_significance: gdd.significance(),
            gdd,
            soil_moisture,
            soil_temp_c: live.soil.soil_temp_c,
            forecast,
        })
    }

    async fn fetch_history(&self, request: &PlanRequest) -> Result<GddSummary> {
        let Some((start, end)) =
            archive_window(request.sowing_date, request.today, self.archive_lag_days)
        else {
            tracing::info!(
                "Sowing date {} is too recent for archive data, using zero GDD",
                request.sowing_date
            );
            return Ok(GddSummary::zero());
        };

        let records = self
            .archive
            .fetch_daily(
                request.location.latitude,
                request.location.longitude,
                start,
                end,
            )
            .await?;

        Ok(accumulate_gdd(&records, request.crop.base_temp_c()))
    }

    fn is_current(&self, run_id: u64) -> bool {
        self.current_run.load(Ordering::SeqCst) == run_id
    }

    async fn transition(&self, run_id: u64, phase: Phase) -> Result<()> {
        {
            let mut state = self.state.write().await;
            if !self.is_current(run_id) {
                tracing::warn!("Run {} superseded before {:?}", run_id, phase);
                return Err(CropwiseError::Superseded(run_id));
            }
            state.phase = phase;
        }
        tracing::info!("Run {}: {}", run_id, phase.label());
        self.notify(run_id, phase);
        Ok(())
    }

    /// Apply a terminal outcome if the run is still current
    async fn finish(
        &self,
        run_id: u64,
        outcome: std::result::Result<&GrowthPlan, &CropwiseError>,
    ) -> Result<()> {
        let phase = {
            let mut state = self.state.write().await;
            if !self.is_current(run_id) {
                tracing::warn!("Discarding late result of run {}", run_id);
                return Err(CropwiseError::Superseded(run_id));
            }
            match outcome {
                Ok(plan) => {
                    state.phase = Phase::Merged;
                    state.result = Some(plan.clone());
                    state.error = None;
                }
                Err(e) => {
                    state.phase = Phase::Failed;
                    state.result = None;
                    state.error = Some(e.to_string());
                }
            }
            state.phase
        };
        self.notify(run_id, phase);
        Ok(())
    }

    fn notify(&self, run_id: u64, phase: Phase) {
        if let Some(ref tx) = self.progress {
            // Receiver may be gone; progress is best effort
            let _ = tx.send(PhaseUpdate { run_id, phase });
        }
    }
}
