//! 評価種別の判定とカテゴリ表
//!
//! 評価シートは種別ごとに列数と設問が異なる。
//! 種別はヘッダー数（と販売系キーワードの有無）で判定し、
//! 種別ごとの「カテゴリ → 候補列名」表で採点列を引く。

use crate::header::joined_headers;
use serde::{Deserialize, Serialize};

/// 評価種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    Operative,
    Administrative,
    Commercial,
    Directive,
}

/// この列数以下は現場職
pub const OPERATIVE_MAX_COLUMNS: usize = 51;
/// この列数以下は事務職（販売系キーワードが無い場合）
pub const ADMINISTRATIVE_MAX_COLUMNS: usize = 53;
/// 販売系キーワードで営業職を判定する上限
pub const KEYWORD_RANGE_MAX_COLUMNS: usize = 56;

/// 営業職を示すヘッダーキーワード
pub const SALES_KEYWORDS: &[&str] = &["VENTAS", "CUOTAS", "MEDICO"];

impl EvaluationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationType::Operative => "OPERATIVE",
            EvaluationType::Administrative => "ADMINISTRATIVE",
            EvaluationType::Commercial => "COMMERCIAL",
            EvaluationType::Directive => "DIRECTIVE",
        }
    }

    /// ヘッダー行から評価種別を判定
    pub fn classify(headers: &[String]) -> Self {
        let count = headers.len();

        let detected = if count <= OPERATIVE_MAX_COLUMNS {
            EvaluationType::Operative
        } else if count <= KEYWORD_RANGE_MAX_COLUMNS {
            let text = joined_headers(headers);
            if SALES_KEYWORDS.iter().any(|k| text.contains(k)) {
                EvaluationType::Commercial
            } else if count <= ADMINISTRATIVE_MAX_COLUMNS {
                EvaluationType::Administrative
            } else {
                EvaluationType::Directive
            }
        } else {
            EvaluationType::Directive
        };

        log::info!("Evaluation type detected: {} ({} columns)", detected, count);
        detected
    }

    /// 種別ごとのカテゴリ表（セクション順）
    pub fn sections(&self) -> &'static [&'static [CategorySpec]] {
        match self {
            EvaluationType::Operative => &[OPERATIVE_ROLE, FORMAL_COMMITMENT, OPERATIVE_BEHAVIOR],
            EvaluationType::Administrative => {
                &[ADMINISTRATIVE_ROLE, FORMAL_COMMITMENT, ADMINISTRATIVE_BEHAVIOR]
            }
            EvaluationType::Commercial => &[COMMERCIAL_ROLE, KEYWORD_COMMITMENT, KEYWORD_BEHAVIOR],
            EvaluationType::Directive => &[DIRECTIVE_ROLE, KEYWORD_COMMITMENT, KEYWORD_BEHAVIOR],
        }
    }

    /// カテゴリ表を平坦化して返す
    pub fn categories(&self) -> impl Iterator<Item = &'static CategorySpec> {
        self.sections().iter().flat_map(|section| section.iter())
    }
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 評価カテゴリ（能力の評価軸）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Organization,
    MeetsResults,
    ConstructiveContributions,
    CarriesOutActivities,
    Analysis,
    Reports,
    AppliesTraining,
    EquipmentUse,
    TaskDelivery,
    Sales,
    Clients,
    Leadership,
    Management,
    TeamEvaluation,
    PolicyCompliance,
    QualityKnowledge,
    ProposesImprovements,
    Relationships,
    Teamwork,
    ServiceAttitude,
}

impl Category {
    /// レポート表示ラベル（組織化・成果は種別で文言が変わる）
    pub fn label(&self, evaluation_type: EvaluationType) -> &'static str {
        match (self, evaluation_type) {
            (Category::Organization, EvaluationType::Commercial) => {
                "Planning and organization of commercial work"
            }
            (Category::Organization, EvaluationType::Directive) => {
                "Strategic organization and planning"
            }
            (Category::Organization, EvaluationType::Administrative) => {
                "Organization of administrative tasks"
            }
            (Category::Organization, EvaluationType::Operative) => {
                "Work organization and meeting deadlines"
            }
            (Category::MeetsResults, EvaluationType::Commercial) => {
                "Achievement of commercial targets and quotas"
            }
            (Category::MeetsResults, EvaluationType::Directive) => {
                "Results of the managed area"
            }
            (Category::MeetsResults, EvaluationType::Administrative) => {
                "Completion of tasks and procedures"
            }
            (Category::MeetsResults, EvaluationType::Operative) => {
                "Meets the expected results of the role"
            }
            (Category::ConstructiveContributions, _) => "Supports the area with constructive contributions",
            (Category::CarriesOutActivities, _) => "Carries out assigned activities as instructed",
            (Category::Analysis, _) => "Problem analysis and solving",
            (Category::Reports, _) => "Timely reports and correspondence",
            (Category::AppliesTraining, _) => "Applies training and coaching concepts",
            (Category::EquipmentUse, _) => "Proper use of equipment and resources",
            (Category::TaskDelivery, _) => "Delivery of reports and assigned tasks",
            (Category::Sales, _) => "Quota and medical panel achievement",
            (Category::Clients, _) => "Client and physician relations",
            (Category::Leadership, _) => "Team leadership and direction",
            (Category::Management, _) => "Efficient resource management",
            (Category::TeamEvaluation, _) => "Team results evaluation and analysis",
            (Category::PolicyCompliance, _) => "Complies with policies, procedures, rules and schedules",
            (Category::QualityKnowledge, _) => "Knows and applies the quality policy",
            (Category::ProposesImprovements, _) => "Proposes improvements and constructive ideas",
            (Category::Relationships, _) => "Interpersonal relationships and cordiality",
            (Category::Teamwork, _) => "Teamwork and collaboration",
            (Category::ServiceAttitude, _) => "Service attitude",
        }
    }
}

/// カテゴリと候補列名（優先順）
#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub category: Category,
    pub candidates: &'static [&'static str],
}

const fn spec(category: Category, candidates: &'static [&'static str]) -> CategorySpec {
    CategorySpec { category, candidates }
}

// ============================================
// 現場職・事務職（設問文で照合）
// ============================================

const OPERATIVE_ROLE: &[CategorySpec] = &[
    spec(Category::Organization, &["Organiza las tareas a fin de cumplir con los tiempos establecidos"]),
    spec(Category::MeetsResults, &["Cumple con los resultados esperados de su función"]),
    spec(
        Category::ConstructiveContributions,
        &["Demuestra capacidad para apoyar y generar aportes constructivos al área"],
    ),
    spec(
        Category::CarriesOutActivities,
        &["Realiza las actividades encomendadas según las instrucciones dadas"],
    ),
];

const ADMINISTRATIVE_ROLE: &[CategorySpec] = &[
    spec(Category::Organization, &["Conoce y aplica los procedimientos del área"]),
    spec(Category::MeetsResults, &["Cumple con los resultados esperados de su función"]),
    spec(
        Category::ConstructiveContributions,
        &["Demuestra capacidad para apoyar y generar aportes constructivos"],
    ),
    spec(
        Category::CarriesOutActivities,
        &["Realiza las actividades encomendadas según las instrucciones"],
    ),
    spec(
        Category::Analysis,
        &["Demuestra capacidad para analizar y solucionar los problemas"],
    ),
    spec(Category::Reports, &["Presenta informes, cartas, etc., de manera oportuna"]),
    spec(
        Category::AppliesTraining,
        &["Aplica en su desempeño diario los conceptos vistos en capacitaciones"],
    ),
    spec(Category::EquipmentUse, &["Hace uso adecuado del equipo y demás elementos"]),
    spec(Category::TaskDelivery, &["Entrega los informes o tareas encomendadas"]),
];

const FORMAL_COMMITMENT: &[CategorySpec] = &[
    spec(
        Category::PolicyCompliance,
        &["Demuestra compromiso con el cumplimiento de los objetivos"],
    ),
    spec(Category::QualityKnowledge, &["Actúa en pro de los intereses de la empresa"]),
    spec(Category::ProposesImprovements, &["Propone alternativas para mejorar el trabajo"]),
];

const OPERATIVE_BEHAVIOR: &[CategorySpec] = &[
    spec(
        Category::Relationships,
        &["RELACIONES INTERPERSONALES", "Mantiene relaciones de cordialidad"],
    ),
    spec(Category::Teamwork, &["TRABAJO EN EQUIPO", "Apoya a los compañeros"]),
    spec(Category::ServiceAttitude, &["ACTITUD DE SERVICIO", "Se preocupa por satisfacer"]),
];

const ADMINISTRATIVE_BEHAVIOR: &[CategorySpec] = &[
    spec(Category::Relationships, &["RELACIONES INTERPERSONALES"]),
    spec(Category::Teamwork, &["TRABAJO EN EQUIPO"]),
    spec(Category::ServiceAttitude, &["ACTITUD DE SERVICIO"]),
];

// ============================================
// 営業職・管理職（キーワードで照合）
// ============================================

const COMMERCIAL_ROLE: &[CategorySpec] = &[
    spec(Category::Organization, &["ORGANIZA", "ORGANIZACION", "PLANIFICA"]),
    spec(Category::MeetsResults, &["CUMPLE", "RESULTADOS", "OBJETIVOS"]),
    spec(Category::AppliesTraining, &["APLICA", "CAPACITACION", "ENTRENAMIENTO"]),
    spec(Category::EquipmentUse, &["USO", "EQUIPOS", "RECURSOS"]),
    spec(Category::Sales, &["VENTAS", "CUOTAS", "PANEL MEDICO"]),
    spec(Category::Clients, &["CLIENTES", "MEDICOS", "ATENCION"]),
];

const DIRECTIVE_ROLE: &[CategorySpec] = &[
    spec(Category::Organization, &["ORGANIZA", "ORGANIZACION", "PLANIFICA"]),
    spec(Category::MeetsResults, &["CUMPLE", "RESULTADOS", "OBJETIVOS"]),
    spec(Category::AppliesTraining, &["APLICA", "CAPACITACION", "ENTRENAMIENTO"]),
    spec(Category::EquipmentUse, &["USO", "EQUIPOS", "RECURSOS"]),
    spec(Category::Leadership, &["LIDERAZGO", "DIRECCION"]),
    spec(Category::Management, &["GESTION", "EFICIENTE"]),
    spec(Category::TeamEvaluation, &["EVALUACION", "ANALISIS", "EQUIPO"]),
];

const KEYWORD_COMMITMENT: &[CategorySpec] = &[
    spec(Category::PolicyCompliance, &["CUMPLE", "POLITICAS", "PROCEDIMIENTOS"]),
    spec(Category::QualityKnowledge, &["CALIDAD", "POLITICA DE CALIDAD"]),
    spec(Category::ProposesImprovements, &["MEJORAS", "IDEAS", "ALTERNATIVAS"]),
];

const KEYWORD_BEHAVIOR: &[CategorySpec] = &[
    spec(Category::Relationships, &["RELACIONES", "INTERPERSONALES", "CORDIALIDAD"]),
    spec(Category::Teamwork, &["EQUIPO", "COLABORACION"]),
    spec(Category::ServiceAttitude, &["SERVICIO", "ACTITUD"]),
];
