use crate::infra::{load_advisor, parse_choice, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;
use visa_advisor::advisor::export::{cost_csv_string, tco_csv_string};
use visa_advisor::advisor::{
    Assessment, AssessmentRequest, CandidateLocation, CostProjection, DurationBand,
    EmploymentType, InputProfile, JobCategory, LeadTimeTolerance, Nationality, Ranking,
    Recommendation, Route, SkillLevel, TcoComparison, TimelineOutcome, VisaAdvisor, VisaKey,
};
use visa_advisor::config::AppConfig;
use visa_advisor::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct ProfileArgs {
    /// Job category, e.g. manufacturing, care, food_service, it
    #[arg(long, value_parser = parse_choice::<JobCategory>)]
    pub(crate) job_category: Option<JobCategory>,
    /// full_time_permanent, full_time_contract or part_time
    #[arg(long, value_parser = parse_choice::<EmploymentType>)]
    pub(crate) employment_type: Option<EmploymentType>,
    /// under_1y, y1_to_3, y3_to_5 or y5_plus
    #[arg(long, value_parser = parse_choice::<DurationBand>)]
    pub(crate) duration: Option<DurationBand>,
    /// none, experienced or university
    #[arg(long, value_parser = parse_choice::<SkillLevel>)]
    pub(crate) skill_level: Option<SkillLevel>,
    /// asap, mid_term or planned
    #[arg(long, value_parser = parse_choice::<LeadTimeTolerance>)]
    pub(crate) lead_time: Option<LeadTimeTolerance>,
    /// already_domestic, overseas_ok or either
    #[arg(long, value_parser = parse_choice::<CandidateLocation>)]
    pub(crate) location: Option<CandidateLocation>,
    /// Number of workers to hire
    #[arg(long, default_value_t = 1)]
    pub(crate) headcount: u32,
    #[arg(long, value_parser = parse_choice::<Nationality>)]
    pub(crate) nationality: Option<Nationality>,
}

impl ProfileArgs {
    pub(crate) fn to_profile(&self) -> InputProfile {
        InputProfile {
            job_category: self.job_category,
            employment_type: self.employment_type,
            duration_band: self.duration,
            skill_level: self.skill_level,
            lead_time_tolerance: self.lead_time,
            candidate_location: self.location,
            headcount: self.headcount,
            nationality: self.nationality,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    #[command(flatten)]
    pub(crate) profile: ProfileArgs,
    /// Assess this candidate instead of the top-ranked one
    #[arg(long)]
    pub(crate) select: Option<String>,
    /// Cost horizon in months (defaults to ADVISOR_DEFAULT_HORIZON_MONTHS)
    #[arg(long)]
    pub(crate) horizon: Option<u32>,
    /// Hiring decision date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) decided_on: Option<NaiveDate>,
    /// Override the route derived from --location
    #[arg(long, value_parser = parse_choice::<Route>)]
    pub(crate) route: Option<Route>,
    /// Print the full assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CostArgs {
    /// Visa candidate key, e.g. trainee
    #[arg(long)]
    pub(crate) candidate: String,
    #[arg(long, default_value_t = 1)]
    pub(crate) headcount: u32,
    #[arg(long, value_parser = parse_choice::<Nationality>)]
    pub(crate) nationality: Option<Nationality>,
    /// Cost horizon in months (defaults to ADVISOR_DEFAULT_HORIZON_MONTHS)
    #[arg(long)]
    pub(crate) horizon: Option<u32>,
    /// Also compare against a domestic hire in this job category
    #[arg(long, value_parser = parse_choice::<JobCategory>)]
    pub(crate) job_category: Option<JobCategory>,
    /// Emit CSV instead of a text summary
    #[arg(long)]
    pub(crate) csv: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TimelineArgs {
    #[arg(long)]
    pub(crate) candidate: String,
    /// domestic or overseas
    #[arg(long, value_parser = parse_choice::<Route>, default_value = "overseas")]
    pub(crate) route: Route,
    /// Hiring decision date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) decided_on: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Hiring decision date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) decided_on: Option<NaiveDate>,
    /// Number of workers in the sample hire
    #[arg(long, default_value_t = 3)]
    pub(crate) headcount: u32,
}

fn advisor_from_env(rules: Option<PathBuf>) -> Result<VisaAdvisor, AppError> {
    let config = AppConfig::load()?;
    load_advisor(rules, &config.advisor)
}

pub(crate) fn run_recommend(args: RecommendArgs, rules: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = advisor_from_env(rules)?;
    let request = AssessmentRequest {
        profile: args.profile.to_profile(),
        selected: args.select.as_deref().map(VisaKey::from),
        horizon_months: args
            .horizon
            .unwrap_or_else(|| advisor.default_horizon_months()),
        decided_on: args
            .decided_on
            .unwrap_or_else(|| Local::now().date_naive()),
        route: args.route,
    };

    let assessment = advisor.assess(&request)?;
    if args.json {
        match serde_json::to_string_pretty(&assessment) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Assessment payload unavailable: {err}"),
        }
        return Ok(());
    }

    render_assessment(&assessment, &advisor.tables().unit);
    Ok(())
}

pub(crate) fn run_cost(args: CostArgs, rules: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = advisor_from_env(rules)?;
    let key = VisaKey::from(args.candidate.as_str());
    let horizon = args
        .horizon
        .unwrap_or_else(|| advisor.default_horizon_months());

    let projection = advisor.project_cost(&key, args.headcount, args.nationality, horizon)?;
    let comparison = match args.job_category {
        Some(category) => Some(advisor.compare_tco(
            &key,
            category,
            args.headcount,
            horizon,
            args.nationality,
        )?),
        None => None,
    };

    if args.csv {
        print!("{}", cost_csv_string(&projection)?);
        if let Some(comparison) = &comparison {
            println!();
            print!("{}", tco_csv_string(comparison)?);
        }
        return Ok(());
    }

    render_cost(&projection, &advisor.tables().unit);
    if let Some(comparison) = &comparison {
        render_tco(comparison);
    }
    Ok(())
}

pub(crate) fn run_timeline(args: TimelineArgs, rules: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = advisor_from_env(rules)?;
    let key = VisaKey::from(args.candidate.as_str());
    let decided_on = args
        .decided_on
        .unwrap_or_else(|| Local::now().date_naive());

    let outcome = advisor.project_timeline(&key, args.route, decided_on)?;
    println!("Onboarding schedule for {key} (decided {decided_on})");
    render_timeline(&outcome);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs, rules: Option<PathBuf>) -> Result<(), AppError> {
    let advisor = advisor_from_env(rules)?;
    let decided_on = args
        .decided_on
        .unwrap_or_else(|| Local::now().date_naive());

    println!("Visa advisor demo");
    println!(
        "Sample need: {} long-term factory workers, no prior experience, sourced abroad",
        args.headcount
    );

    let request = AssessmentRequest {
        profile: sample_profile(args.headcount),
        selected: None,
        horizon_months: advisor.default_horizon_months(),
        decided_on,
        route: None,
    };
    let assessment = advisor.assess(&request)?;
    render_assessment(&assessment, &advisor.tables().unit);

    let part_time = InputProfile {
        employment_type: Some(EmploymentType::PartTime),
        duration_band: Some(DurationBand::Under1y),
        lead_time_tolerance: Some(LeadTimeTolerance::Asap),
        candidate_location: Some(CandidateLocation::AlreadyDomestic),
        ..sample_profile(args.headcount)
    };
    println!("\nSame job as short-notice part-time shifts:");
    render_ranking(&advisor.rank_candidates(&part_time));

    Ok(())
}

pub(crate) fn sample_profile(headcount: u32) -> InputProfile {
    InputProfile {
        job_category: Some(JobCategory::Manufacturing),
        employment_type: Some(EmploymentType::FullTimePermanent),
        duration_band: Some(DurationBand::Y3To5),
        skill_level: Some(SkillLevel::None),
        lead_time_tolerance: Some(LeadTimeTolerance::Planned),
        candidate_location: Some(CandidateLocation::OverseasOk),
        headcount,
        nationality: Some(Nationality::Vietnam),
    }
}

fn render_assessment(assessment: &Assessment, unit: &str) {
    println!("\nRule tables {}", assessment.table_version);
    if assessment.excluded.is_empty() {
        println!("Excluded: none");
    } else {
        println!("Excluded:");
        for exclusion in &assessment.excluded {
            println!(
                "  - {}: {}",
                exclusion.candidate,
                exclusion.reason.summary()
            );
        }
    }

    render_ranking(&assessment.ranking);

    let Some(selected) = &assessment.selected else {
        return;
    };

    println!(
        "\n{} ({}){}",
        selected.entry.label,
        selected.entry.key,
        if selected.overridden { " [selected]" } else { "" }
    );
    println!("  Max stay: {}", selected.entry.max_stay);
    for tag in &selected.explanation.tags {
        println!("  #{tag}");
    }
    println!("  {}", selected.explanation.narrative);
    println!("  Caution: {}", selected.entry.caution);

    render_cost(&selected.cost, unit);
    if let Some(comparison) = &selected.tco {
        render_tco(comparison);
    }
    println!("\nOnboarding schedule");
    render_timeline(&selected.timeline);
}

fn render_ranking(ranking: &Ranking) {
    match ranking.recommendation() {
        Recommendation::Candidate(top) => {
            println!("Recommended: {} (score {})", top.label, top.score)
        }
        Recommendation::NoSuitableCandidate => {
            println!("No visa option scores positively for this profile")
        }
    }
    for (position, scored) in ranking.candidates.iter().enumerate() {
        println!(
            "  {}. {} | score {} | {} rules matched",
            position + 1,
            scored.label,
            scored.score,
            scored.components.len()
        );
    }
    for scored in &ranking.not_recommended {
        println!("  -  {} | score {} (not recommended)", scored.label, scored.score);
    }
}

fn render_cost(projection: &CostProjection, unit: &str) {
    println!(
        "\nCost for {} worker(s) over {} months ({unit}, nationality factor {:.2})",
        projection.headcount, projection.horizon_months, projection.nationality_factor
    );
    println!(
        "- One-time: {:.1} - {:.1}",
        projection.one_time_min, projection.one_time_max
    );
    println!(
        "- Monthly: {:.1} - {:.1}",
        projection.monthly_min, projection.monthly_max
    );
    println!(
        "- Total: {:.1} - {:.1}",
        projection.total_min, projection.total_max
    );
}

fn render_tco(comparison: &TcoComparison) {
    println!(
        "\nDomestic vs foreign hire ({}, {} months)",
        comparison.job_category.label(),
        comparison.horizon_months
    );
    for row in comparison.rows() {
        println!(
            "  {:<32} {:>10.1} {:>10.1}",
            row.component, row.domestic, row.foreign
        );
    }
    if comparison.difference >= 0.0 {
        println!("  Foreign hire saves {:.1}", comparison.difference);
    } else {
        println!("  Domestic hire saves {:.1}", -comparison.difference);
    }
}

fn render_timeline(outcome: &TimelineOutcome) {
    match outcome {
        TimelineOutcome::Scheduled {
            requested_route,
            route_used,
            fell_back,
            projection,
        } => {
            if *fell_back {
                println!(
                    "  No {} route defined; showing the {} route",
                    requested_route.label(),
                    route_used.label()
                );
            }
            for step in &projection.steps {
                println!(
                    "  {} (latest {}) {} [{}]",
                    step.start_date, step.latest_start_date, step.label, step.duration_text
                );
            }
            println!(
                "  Work begins {} at the earliest, {} at the latest",
                projection.arrival_date, projection.latest_arrival_date
            );
        }
        TimelineOutcome::Unavailable { requested_route } => {
            println!("  No onboarding steps defined for the {} route", requested_route.label());
        }
    }
}
