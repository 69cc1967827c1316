//! Static seed datasets
//!
//! Served whenever the backend is unavailable. Times are relative to `now`
//! so events stay upcoming and news stays recent.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use core_api::{Event, NewsItem, Poll, PollOption, YouthLeader, YouthProgram};

const PRESS_SERVICE: &str = "Пресс-служба";
const PRESS_SERVICE_FULL: &str = "Пресс-служба Ликуд";

/// Id served when a detail seed for the requested id does not exist.
pub const DEFAULT_DETAIL_ID: &str = "1";

fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn news_item(
    id: &str,
    title: &str,
    summary: &str,
    category: &str,
    published_at: DateTime<Utc>,
) -> NewsItem {
    NewsItem {
        id: id.to_string(),
        title: title.to_string(),
        summary: summary.to_string(),
        content: String::new(),
        image_url: None,
        published_at,
        category: category.to_string(),
        author: PRESS_SERVICE.to_string(),
    }
}

pub fn news(now: DateTime<Utc>) -> Vec<NewsItem> {
    let ago = |days| now - Duration::days(days);
    vec![
        news_item(
            "1",
            "Заседание партии по вопросам безопасности",
            "Обсуждение актуальных вопросов национальной безопасности на заседании фракции Ликуд в Кнессете.",
            "Политика",
            ago(1),
        ),
        news_item(
            "2",
            "Новый законопроект об образовании",
            "Фракция Ликуд представила законопроект о реформе системы образования для русскоязычных школ.",
            "Образование",
            ago(2),
        ),
        news_item(
            "3",
            "Встреча с русскоязычной общиной в Хайфе",
            "Депутаты Кнессета провели встречу с представителями русскоязычной общины в Хайфе.",
            "Община",
            ago(3),
        ),
        news_item(
            "4",
            "Программа поддержки новых репатриантов",
            "Утверждена новая программа помощи в интеграции для репатриантов из стран бывшего СССР.",
            "Алия",
            ago(4),
        ),
        news_item(
            "5",
            "Экономический форум русскоязычных предпринимателей",
            "В Тель-Авиве прошёл ежегодный форум русскоязычных предпринимателей при поддержке партии.",
            "Экономика",
            ago(5),
        ),
    ]
}

/// Full articles for the detail screen.
fn news_articles(now: DateTime<Utc>) -> Vec<NewsItem> {
    let mut security = news_item(
        "1",
        "Заседание партии по вопросам безопасности",
        "Обсуждение актуальных вопросов национальной безопасности на заседании фракции.",
        "Политика",
        now - Duration::days(1),
    );
    security.author = PRESS_SERVICE_FULL.to_string();
    security.content = [
        "Вчера в Кнессете состоялось расширенное заседание фракции Ликуд, посвящённое вопросам национальной безопасности.",
        "На заседании были обсуждены ключевые вызовы в сфере обороны, включая укрепление границ и развитие системы ПВО. Депутаты фракции представили предложения по обновлению стратегии национальной безопасности.",
        "Особое внимание было уделено вопросам кибербезопасности и защите критической инфраструктуры. Участники заседания подчеркнули важность международного сотрудничества в этой области.",
        "По итогам заседания был подготовлен пакет законодательных инициатив, которые будут представлены на ближайшем пленарном заседании Кнессета.",
    ]
    .join("\n\n");

    let mut education = news_item(
        "2",
        "Новый законопроект об образовании",
        "Фракция Ликуд представила законопроект о реформе системы образования.",
        "Образование",
        now - Duration::days(2),
    );
    education.author = PRESS_SERVICE_FULL.to_string();
    education.content = [
        "Фракция Ликуд представила на рассмотрение Кнессета новый законопроект, направленный на улучшение качества образования.",
        "Основные положения законопроекта включают:\n- Увеличение финансирования школ в периферийных районах\n- Создание дополнительных программ на русском языке\n- Поддержка учителей-репатриантов\n- Развитие STEM-образования",
        "Законопроект получил широкую поддержку среди русскоязычных депутатов и представителей образовательного сообщества.",
    ]
    .join("\n\n");

    vec![security, education]
}

/// Article `id`, or the default article when no seed exists for it.
pub fn news_article(id: &str, now: DateTime<Utc>) -> NewsItem {
    pick_or_default(news_articles(now), |a| a.id == id)
}

#[allow(clippy::too_many_arguments)]
fn event(
    id: &str,
    title: &str,
    description: &str,
    date: DateTime<Utc>,
    time: &str,
    city: &str,
    address: &str,
    max_participants: u32,
    current_participants: u32,
    is_registered: bool,
) -> Event {
    Event {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        date: iso(date),
        time: time.to_string(),
        city: city.to_string(),
        address: address.to_string(),
        image_url: None,
        max_participants,
        current_participants,
        is_registered,
    }
}

pub fn events(now: DateTime<Utc>) -> Vec<Event> {
    let ahead = |days| now + Duration::days(days);
    vec![
        event(
            "1",
            "Общее собрание русскоязычного отделения",
            "Ежемесячное собрание членов партии. Обсуждение текущих вопросов.",
            ahead(7),
            "19:00",
            "Тель-Авив",
            "ул. Кинг Джордж, 15",
            100,
            67,
            false,
        ),
        event(
            "2",
            "Лекция: Экономическая политика Израиля",
            "Открытая лекция о текущей экономической ситуации и планах правительства.",
            ahead(14),
            "18:30",
            "Иерусалим",
            "ул. Яффо, 42",
            80,
            45,
            true,
        ),
        event(
            "3",
            "Встреча с депутатом Кнессета",
            "Открытая встреча с депутатом фракции Ликуд. Вопросы и ответы.",
            ahead(21),
            "20:00",
            "Хайфа",
            "ул. Герцль, 88",
            120,
            112,
            false,
        ),
        event(
            "4",
            "Волонтёрская акция",
            "Совместная волонтёрская акция помощи нуждающимся семьям.",
            ahead(28),
            "10:00",
            "Беэр-Шева",
            "пл. Независимости, 1",
            50,
            23,
            false,
        ),
    ]
}

/// Seed events in `city`; every seed when `city` is `None`.
pub fn events_in(city: Option<&str>, now: DateTime<Utc>) -> Vec<Event> {
    let all = events(now);
    match city {
        Some(city) => all.into_iter().filter(|e| e.city == city).collect(),
        None => all,
    }
}

/// Event `id` with its full agenda, or the default event.
pub fn event_detail(id: &str, now: DateTime<Utc>) -> Event {
    let mut details: Vec<Event> = events(now).into_iter().take(2).collect();
    for event in &mut details {
        match event.id.as_str() {
            "1" => {
                event.description = "Ежемесячное собрание членов партии Ликуд. На повестке дня:\n\n\
                    1. Отчёт о деятельности за прошедший месяц\n\
                    2. Обсуждение предстоящих выборов в местные органы власти\n\
                    3. Планирование волонтёрских акций\n\
                    4. Вопросы и предложения участников\n\n\
                    Приглашаем всех членов партии и сочувствующих. Будут предоставлены лёгкие закуски и напитки."
                    .to_string();
                event.address = "ул. Кинг Джордж, 15, 3-й этаж, зал А".to_string();
            }
            "2" => {
                event.description = "Открытая лекция о текущей экономической ситуации и планах правительства.\n\n\
                    Лектор: проф. Давид Коган, экономический советник фракции Ликуд.\n\n\
                    Темы лекции:\n\
                    - Текущее состояние экономики\n\
                    - Инфляция и меры борьбы\n\
                    - Перспективы развития хай-тек сектора\n\
                    - Социальная политика и бюджет\n\n\
                    Вход свободный. Требуется предварительная регистрация."
                    .to_string();
                event.address = "ул. Яффо, 42, конференц-зал".to_string();
            }
            _ => {}
        }
    }
    pick_or_default(details, |e| e.id == id)
}

/// Item matching `wanted`, else the first item (the default).
fn pick_or_default<T>(mut items: Vec<T>, wanted: impl Fn(&T) -> bool) -> T {
    let index = items.iter().position(wanted).unwrap_or(0);
    items.swap_remove(index)
}

fn poll(
    id: &str,
    question: &str,
    options: &[(&str, &str, u32)],
    voted_option_id: Option<&str>,
    is_active: bool,
    ends_at: DateTime<Utc>,
) -> Poll {
    let options: Vec<PollOption> = options
        .iter()
        .map(|(id, text, votes)| PollOption {
            id: id.to_string(),
            text: text.to_string(),
            votes: *votes,
        })
        .collect();
    let total_votes = options.iter().map(|o| o.votes).sum();

    Poll {
        id: id.to_string(),
        question: question.to_string(),
        options,
        total_votes,
        voted_option_id: voted_option_id.map(str::to_string),
        is_active,
        ends_at,
    }
}

pub fn polls(now: DateTime<Utc>) -> Vec<Poll> {
    vec![
        poll(
            "1",
            "Какой вопрос для вас наиболее важен?",
            &[
                ("o1", "Безопасность", 145),
                ("o2", "Экономика", 98),
                ("o3", "Образование", 67),
                ("o4", "Здравоохранение", 54),
            ],
            None,
            true,
            now + Duration::days(2),
        ),
        poll(
            "2",
            "Как вы оцениваете работу фракции за последний месяц?",
            &[
                ("o5", "Отлично", 89),
                ("o6", "Хорошо", 156),
                ("o7", "Удовлетворительно", 43),
                ("o8", "Плохо", 12),
            ],
            None,
            true,
            now + Duration::days(5),
        ),
        poll(
            "3",
            "Какой формат мероприятий вы предпочитаете?",
            &[
                ("o9", "Лекции и семинары", 78),
                ("o10", "Встречи с депутатами", 124),
                ("o11", "Волонтёрские акции", 56),
                ("o12", "Культурные мероприятия", 92),
            ],
            Some("o10"),
            false,
            now - Duration::days(1),
        ),
    ]
}

/// Poll `id`, or the first seed poll.
pub fn poll_detail(id: &str, now: DateTime<Utc>) -> Poll {
    pick_or_default(polls(now), |p| p.id == id)
}

/// Event shown on the home screen when nothing live is available.
pub fn upcoming_event(now: DateTime<Utc>) -> Event {
    pick_or_default(events(now), |e| !e.is_full())
}

/// Poll shown on the home screen when nothing live is available.
pub fn featured_poll(now: DateTime<Utc>) -> Poll {
    pick_or_default(polls(now), |p| p.is_active)
}

pub fn youth_programs() -> Vec<YouthProgram> {
    vec![
        YouthProgram {
            id: "1".to_string(),
            title: "Школа молодого лидера".to_string(),
            description: "Программа подготовки молодых политических лидеров. Курсы публичных выступлений, политического анализа и управления проектами.".to_string(),
            age_range: Some("18-30".to_string()),
            schedule: None,
        },
        YouthProgram {
            id: "2".to_string(),
            title: "Политический клуб".to_string(),
            description: "Еженедельные дискуссии на актуальные политические и общественные темы. Открыто для всех желающих.".to_string(),
            age_range: None,
            schedule: Some("Каждый четверг, 19:00".to_string()),
        },
        YouthProgram {
            id: "3".to_string(),
            title: "Волонтёрский корпус".to_string(),
            description: "Участие в волонтёрских проектах и общественных инициативах. Помощь нуждающимся и развитие общины.".to_string(),
            age_range: None,
            schedule: None,
        },
    ]
}

pub fn youth_leaders() -> Vec<YouthLeader> {
    [
        ("1", "Давид Коган", "Председатель молодёжного отделения"),
        ("2", "Анна Левина", "Координатор программ"),
        ("3", "Михаил Штерн", "Руководитель волонтёрского корпуса"),
    ]
    .into_iter()
    .map(|(id, name, role)| YouthLeader {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        photo_url: None,
    })
    .collect()
}
