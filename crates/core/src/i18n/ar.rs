//! Arabic strings.

use super::Message;

pub(super) const fn text(message: Message) -> &'static str {
    match message {
        Message::StepCustomerInfo => "بياناتك",
        Message::StepProtectionPlan => "حماية الجهاز",
        Message::StepVerificationDocuments => "مستندات التحقق",
        Message::StepReview => "المراجعة والإرسال",

        Message::TermMonthly => "شهري",
        Message::TermTwelveMonths => "١٢ شهرًا",
        Message::TermTwentyFourMonths => "٢٤ شهرًا",
        Message::TermThirtySixMonths => "٣٦ شهرًا",
        Message::TermMonthlyDescription => "بدون التزام، يمكنك الإلغاء في أي شهر",
        Message::TermTwelveMonthsDescription => "تأجير لمدة سنة بالسعر الأساسي",
        Message::TermTwentyFourMonthsDescription => "تأجير لمدة سنتين، وفّر ٢٥٪ كل شهر",
        Message::TermThirtySixMonthsDescription => "تأجير لمدة ثلاث سنوات، أقل سعر شهري",

        Message::ConditionNew => "جديد",
        Message::ConditionRefurbished => "مجدد ومعتمد",

        Message::BadgePercentOff => "خصم {0}٪",
        Message::BadgeRefurbished => "مجدد: وفّر {0}٪",
        Message::PerMonth => "/شهريًا",
        Message::ProtectionPlanName => "خطة حماية الجهاز",
        Message::ProtectionPlanDescription => "تغطية الأضرار العرضية مقابل {0} شهريًا",

        Message::NameTooShort => "يرجى إدخال الاسم الكامل (حرفان على الأقل)",
        Message::EmailRequired => "يرجى إدخال البريد الإلكتروني",
        Message::EmailInvalid => "يرجى إدخال بريد إلكتروني صحيح",
        Message::PhoneRequired => "يرجى إدخال رقم الجوال",
        Message::PhoneInvalid => "يرجى إدخال رقم جوال سعودي صحيح (05XXXXXXXX)",
        Message::BusinessNameRequired => "يرجى إدخال اسم المنشأة",

        Message::ProtectionChoiceRequired => "يرجى اختيار ما إذا كنت تريد إضافة حماية الجهاز",

        Message::DocumentRequired => "يرجى رفع هذا المستند",
        Message::DocumentTooLarge => "يجب ألا يتجاوز حجم الملف {0} ميجابايت",
        Message::DocumentUnsupportedType => "يُقبل فقط ملفات PDF و JPG و PNG",
        Message::DocumentEmpty => "الملف المرفوع فارغ",

        Message::DocumentUploadFailed => "تعذر رفع المستندات. يرجى المحاولة مرة أخرى.",
        Message::OrderSubmissionFailed => "تعذر إرسال طلبك. يرجى المحاولة مرة أخرى.",
        Message::DocumentsExpired => "انتهت صلاحية المستندات المرفوعة. يرجى رفعها مرة أخرى.",
        Message::OrderConfirmed => "شكرًا لك! تم استلام طلبك رقم {0}.",

        Message::WrongStep => "يرجى إكمال الخطوة الحالية أولًا",
        Message::CheckoutNotStarted => "انتهت جلسة الدفع. يرجى البدء من جديد.",
        Message::ConfigurationIncomplete => "يرجى اختيار السعة واللون ومدة التأجير",

        Message::ProductNotFound => "هذا الجهاز لم يعد متاحًا",
        Message::InvalidRequest => "حدث خطأ في الطلب. يرجى المحاولة مرة أخرى.",
        Message::ServiceUnavailable => "نواجه مشكلة في الاتصال. يرجى المحاولة بعد قليل.",
        Message::UnexpectedError => "حدث خطأ غير متوقع. يرجى المحاولة مرة أخرى.",
    }
}
